/// Formats `data` as `addr xx xx ..` lines of `width` bytes each
#[must_use]
pub fn hexdump(data: &[u8], width: usize) -> String {
    let width = width.max(1);
    data.chunks(width)
        .enumerate()
        .map(|(i, chunk)| {
            let bytes: String = chunk.iter().map(|b| format!(" {b:02x}")).collect();
            format!("{:04x}{bytes}\n", i * width)
        })
        .collect()
}
