/// Options threaded through every encode/decode call.
///
/// Carries no knobs yet; codec signatures accept it so that per-call options
/// can arrive without touching every [`ValueCodec`](crate::serde::ValueCodec)
/// implementation.
#[derive(Clone, Copy, Default, Debug)]
pub struct CodecOptions;
