//! Start-up screen shown before any source has been rendered.

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};

use crate::constants::APP_NAME;
use crate::render::canvas::{FitPolicy, Frame};
use crate::render::plane::Plane;
use crate::render::resources::RenderResources;

/// First line of the start-up screen.
pub const ACCESS_HINT: &str = "Access through browser";

const LINE_SPACING: u32 = 30;
const MARGIN: i32 = 5;

/// Draws the start-up screen: logo (or title) on the primary plane and
/// `lines` at the bottom of the accent plane.
#[must_use]
pub fn render_splash(
    lines: &[String],
    resources: &RenderResources,
    width: u32,
    height: u32,
) -> Frame {
    let mut primary = Plane::new(width, height);
    let mut accent = Plane::new(width, height);
    let style = MonoTextStyle::new(resources.title_font, BinaryColor::On);

    match &resources.logo {
        Some(logo) => logo.paste(&mut primary, Point::zero()),
        None => {
            let origin = Point::new(MARGIN, MARGIN);
            let title = Text::with_baseline(APP_NAME, origin, style, Baseline::Top);
            let Ok(_) = title.draw(&mut primary);
        }
    }

    let count = u32::try_from(lines.len()).unwrap_or(u32::MAX);
    let block = count.saturating_mul(LINE_SPACING);
    let top = height.saturating_sub(block).saturating_sub(3) as i32;

    for (i, line) in lines.iter().enumerate() {
        let y = top + (i as i32) * LINE_SPACING as i32;
        let Ok(_) = Text::with_baseline(line, Point::new(MARGIN, y), style, Baseline::Top)
            .draw(&mut accent);
    }

    Frame {
        primary,
        accent,
        fit: FitPolicy::Native,
        glyphs: Vec::new(),
    }
}

/// Lines announcing where the control plane can be reached.
#[must_use]
pub fn access_lines(ip: &str, port: u16) -> Vec<String> {
    vec![ACCESS_HINT.to_string(), format!("http://{ip}:{port}")]
}

/// Best-effort local IP address discovery.
///
/// Connecting a UDP socket sends nothing; it only selects the outgoing
/// interface. Any failure yields `error-ip-address`.
#[must_use]
pub fn local_ip_address() -> String {
    let probe = || -> std::io::Result<String> {
        let socket = std::net::UdpSocket::bind("0.0.0.0:0")?;
        socket.connect("8.8.8.8:80")?;
        Ok(socket.local_addr()?.ip().to_string())
    };

    probe().unwrap_or_else(|e| {
        tracing::error!("Could not determine local IP address: {e}");
        "error-ip-address".to_string()
    })
}
