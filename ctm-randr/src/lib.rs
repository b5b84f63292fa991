//! # ctm-randr
//!
//! [`PropertyTransport`] over the X11 RandR extension, using `x11rb`'s pure
//! Rust connection. Outputs are looked up by name in the current screen
//! resources; properties are written as INTEGER arrays in replace mode.

use ctm_core::{ElementFormat, PropertyTransport, TransportError};
use tracing::debug;
use x11rb::connection::Connection;
use x11rb::errors::ReplyError;
use x11rb::protocol::randr::{ConnectionExt as _, Output};
use x11rb::protocol::xproto::{AtomEnum, ConnectionExt as _, PropMode, Window};
use x11rb::rust_connection::RustConnection;
use x11rb::NONE;

pub struct RandrTransport {
    conn: RustConnection,
    root: Window,
}

impl RandrTransport {
    /// Open `display`, or `$DISPLAY` when `None`.
    pub fn connect(display: Option<&str>) -> Result<Self, TransportError> {
        let (conn, screen_num) = x11rb::connect(display).map_err(|e| TransportError::Failure {
            code: 1,
            message: format!("cannot open display: {e}"),
        })?;
        let root = conn.setup().roots[screen_num].root;
        debug!(screen_num, root, "connected to X server");
        Ok(Self { conn, root })
    }

    fn intern(&self, name: &str) -> Result<u32, TransportError> {
        let reply = self
            .conn
            .intern_atom(true, name.as_bytes())
            .map_err(connection_failure)?
            .reply()
            .map_err(reply_failure)?;
        Ok(reply.atom)
    }
}

impl PropertyTransport for RandrTransport {
    type Output = Output;

    fn resolve_output(&mut self, name: &str) -> Result<Output, TransportError> {
        let resources = self
            .conn
            .randr_get_screen_resources_current(self.root)
            .map_err(connection_failure)?
            .reply()
            .map_err(reply_failure)?;

        for &output in &resources.outputs {
            let info = self
                .conn
                .randr_get_output_info(output, resources.config_timestamp)
                .map_err(connection_failure)?
                .reply()
                .map_err(reply_failure)?;
            if info.name == name.as_bytes() {
                return Ok(output);
            }
        }
        Err(TransportError::OutputNotFound(name.to_string()))
    }

    fn set_blob_property(
        &mut self,
        output: Output,
        property: &str,
        data: &[u8],
        format: ElementFormat,
    ) -> Result<(), TransportError> {
        let atom = self.intern(property)?;
        if atom == NONE {
            return Err(TransportError::AtomNotFound(property.to_string()));
        }

        // BadName here means the output has no such property.
        match self
            .conn
            .randr_query_output_property(output, atom)
            .map_err(connection_failure)?
            .reply()
        {
            Ok(_) => {}
            Err(ReplyError::X11Error(_)) => {
                return Err(TransportError::PropertyNotFound(property.to_string()))
            }
            Err(e) => return Err(reply_failure(e)),
        }

        let count = format.element_count(data.len());
        let count = u32::try_from(count).map_err(|_| TransportError::Failure {
            code: 1,
            message: format!("{count} elements do not fit in one request"),
        })?;
        debug!(output, property, count, "changing output property");

        // check() waits for the server, so the change is applied once it returns.
        self.conn
            .randr_change_output_property(
                output,
                atom,
                AtomEnum::INTEGER.into(),
                format.bits(),
                PropMode::REPLACE,
                count,
                data,
            )
            .map_err(connection_failure)?
            .check()
            .map_err(reply_failure)
    }
}

fn connection_failure(e: x11rb::errors::ConnectionError) -> TransportError {
    TransportError::Failure {
        code: 1,
        message: e.to_string(),
    }
}

fn reply_failure(e: ReplyError) -> TransportError {
    match e {
        ReplyError::X11Error(err) => TransportError::Failure {
            code: err.error_code,
            message: format!("{:?}", err.error_kind),
        },
        ReplyError::ConnectionError(err) => connection_failure(err),
    }
}
