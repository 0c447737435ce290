use std::{io, os::fd::RawFd};

use mio::{unix::SourceFd, Interest, Token};

/// Readiness notifications for device file descriptors. Once a descriptor is
/// registered, the owner of the poller dispatches the given token whenever the
/// descriptor becomes readable.
pub trait Poller {
    /// Start watching the given descriptor for readability
    fn register(&self, fd: RawFd, token: Token) -> io::Result<()>;

    /// Stop watching the given descriptor. Must be called before the
    /// descriptor is closed.
    fn unregister(&self, fd: RawFd) -> io::Result<()>;
}

impl Poller for mio::Registry {
    fn register(&self, fd: RawFd, token: Token) -> io::Result<()> {
        mio::Registry::register(self, &mut SourceFd(&fd), token, Interest::READABLE)
    }

    fn unregister(&self, fd: RawFd) -> io::Result<()> {
        self.deregister(&mut SourceFd(&fd))
    }
}
