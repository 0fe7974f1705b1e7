use std::io::{self, Read};

/// Reads bytes up to and including a NUL terminator, appending everything
/// before the NUL to `buf`. Returns the count of bytes consumed, terminator
/// included.
pub fn read_until_nul(r: &mut (impl Read + ?Sized), buf: &mut Vec<u8>) -> Result<usize, io::Error> {
    let mut r_len = 0;
    loop {
        let mut byte = [0u8; 1];
        r.read_exact(&mut byte)?;
        r_len += 1;
        if byte[0] == 0 {
            return Ok(r_len);
        }
        buf.push(byte[0]);
    }
}
