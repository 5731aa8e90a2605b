use log::warn;

#[allow(non_snake_case)]
pub fn FOURCC(code: &str) -> u32 {
    let mut chars = code.bytes().chain(std::iter::repeat(b' '));

    let a0 = chars.next().unwrap_or(b' ') as u32;
    let a1 = chars.next().unwrap_or(b' ') as u32;
    let a2 = chars.next().unwrap_or(b' ') as u32;
    let a3 = chars.next().unwrap_or(b' ') as u32;

    return (a3) | ((a2) << 8) | ((a1) << 16) | ((a0) << 24);
}

pub fn fourcc_to_string(fourcc: u32) -> String {
    fourcc.to_be_bytes().iter().map(|&b| b as char).collect()
}

pub fn human_version(ver: u16) -> u16 {
    // This is based on Lingo's `the fileVersion` with a correction to the
    // version number for Director 12.
    const VERSIONS: [(u16, u16); 13] = [
        (1951, 1200),
        (1922, 1150),
        (1921, 1100),
        (1851, 1000),
        (1700, 850),
        (1410, 800),
        (1224, 700),
        (1218, 600),
        (1201, 500),
        (1117, 404),
        (1115, 400),
        (1029, 310),
        (1028, 300),
    ];
    VERSIONS
        .iter()
        .find(|(raw, _)| ver >= *raw)
        .map(|(_, human)| *human)
        .unwrap_or(200)
}

/// Logs a recoverable problem and keeps it for the caller.
pub fn report(diagnostics: &mut Vec<String>, message: String) {
    warn!("{}", message);
    diagnostics.push(message);
}
