//! Reads how long the user has been away from the keyboard and mouse.
//! [GenericIdleProbe] picks the backend enabled at compile time.

#[cfg(feature = "win")]
pub mod win;
#[cfg(feature = "x11")]
pub mod x11;

#[cfg(feature = "win")]
extern crate windows;

#[cfg(feature = "x11")]
extern crate xcb;

use anyhow::Result;

/// Contract every platform backend implements.
#[cfg_attr(test, mockall::automock)]
pub trait IdleProbe: Send {
    /// Milliseconds since the last user input.
    fn idle_time(&mut self) -> Result<u32>;
}

/// Cross platform [IdleProbe].
pub struct GenericIdleProbe {
    inner: Box<dyn IdleProbe>,
}

impl GenericIdleProbe {
    pub fn new() -> Result<Self> {
        cfg_if::cfg_if! {
            if #[cfg(feature = "win")] {
                Ok(Self {
                    inner: Box::new(win::WindowsIdleProbe::new()),
                })
            }
            else if #[cfg(feature = "x11")] {
                Ok(Self {
                    inner: Box::new(x11::LinuxIdleProbe::new()?),
                })
            }
            else {
                Err(anyhow::anyhow!(
                    "No idle backend was compiled in, enable the `x11` or `win` feature"
                ))
            }
        }
    }
}

impl IdleProbe for GenericIdleProbe {
    fn idle_time(&mut self) -> Result<u32> {
        self.inner.idle_time()
    }
}
