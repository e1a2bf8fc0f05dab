use anyhow::{anyhow, Result};
use tracing::instrument;
use xcb::{
    screensaver::{QueryInfo, QueryInfoReply},
    x::{Drawable, Window},
    Connection,
};

use super::IdleProbe;

pub struct LinuxIdleProbe {
    connection: Connection,
    root: Window,
}

impl LinuxIdleProbe {
    pub fn new() -> Result<Self> {
        let (connection, preferred_screen) = Connection::connect(None)?;
        // Only one x11 screen is supported.
        let root = connection
            .get_setup()
            .roots()
            .nth(preferred_screen.max(0) as usize)
            .ok_or_else(|| anyhow!("Screen {preferred_screen} is not available"))?
            .root();
        Ok(Self { connection, root })
    }
}

impl IdleProbe for LinuxIdleProbe {
    #[instrument(skip(self))]
    fn idle_time(&mut self) -> Result<u32> {
        let cookie = self.connection.send_request(&QueryInfo {
            drawable: Drawable::Window(self.root),
        });
        let reply: QueryInfoReply = self.connection.wait_for_reply(cookie)?;
        Ok(reply.ms_since_user_input())
    }
}
