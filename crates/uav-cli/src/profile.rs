//! Parsing of `services,range,radius` UAV profiles.

use anyhow::{bail, Context, Result};

use uav_core::UavProfile;

pub fn parse_profile(raw: &str) -> Result<UavProfile> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let [services, range, radius] = parts.as_slice() else {
        bail!("profile '{}' must look like services,range,radius", raw);
    };

    let profile = UavProfile {
        service_points: services
            .parse()
            .with_context(|| format!("bad service count in '{}'", raw))?,
        max_range: range
            .parse()
            .with_context(|| format!("bad range in '{}'", raw))?,
        recognition_radius: radius
            .parse()
            .with_context(|| format!("bad radius in '{}'", raw))?,
    };
    if profile.max_range <= 0.0 || profile.recognition_radius <= 0.0 {
        bail!("profile '{}' needs a positive range and radius", raw);
    }
    Ok(profile)
}
