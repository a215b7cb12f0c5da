use std::io::{self, ErrorKind, Read};

use ctor::ctor;

#[ctor]
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .init();
}

/// Peer that resets the connection on every read.
struct ResetPeer;

impl Read for ResetPeer {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(ErrorKind::ConnectionReset, "connection reset"))
    }
}

/// Connection that delivers `sent` and then drops mid-request.
pub fn broken_stream(sent: &'static [u8]) -> impl Read {
    sent.chain(ResetPeer)
}

/// Connection that delivers `sent` followed by `filler` forever.
pub fn endless_stream(sent: &'static [u8], filler: u8) -> impl Read {
    sent.chain(io::repeat(filler))
}
