use anyhow::Result;
use derive_more::Deref;
use std::io::{self, Read};
use std::mem;

#[derive(Deref, Clone, Copy)]
pub struct BodyLen(u32);
impl BodyLen {
    pub fn from_len(len: usize) -> Result<Self> {
        let int = u32::try_from(len)?;
        Ok(Self(int))
    }
    pub fn deser(r: &mut (impl Read + ?Sized)) -> Result<(usize, Self), io::Error> {
        let mut buf = [0u8; mem::size_of::<u32>()];
        r.read_exact(&mut buf)?;
        let int = u32::from_le_bytes(buf);
        Ok((buf.len(), Self(int)))
    }
}
