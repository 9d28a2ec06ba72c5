//! `--display` layout parsing.

use anyhow::{bail, Context};
use cursorhome_model::Rect;
use cursorhome_platform_core::{DisplaySnapshot, DisplayTopology, StaticDisplays};

/// Build a topology from `WxH+X+Y` specs. The first display is primary; no
/// specs means a single 1080p display.
pub fn topology_from_args(specs: &[String]) -> anyhow::Result<DisplayTopology> {
    if specs.is_empty() {
        return Ok(DisplayTopology::from_provider(&StaticDisplays::single_1080p())?);
    }
    let displays = specs
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            let bounds = parse_geometry(spec).with_context(|| format!("invalid --display {spec:?}"))?;
            let id = u32::try_from(index)?;
            Ok(DisplaySnapshot::new(id, format!("display-{index}"), bounds, index == 0))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(DisplayTopology::from_provider(&StaticDisplays::new(displays))?)
}

/// Parse `WxH+X+Y`. Offsets may be negative: `1280x1024-1280+0`.
pub fn parse_geometry(spec: &str) -> anyhow::Result<Rect> {
    let (width, rest) = spec.split_once('x').context("expected WxH+X+Y")?;
    let split = rest
        .find(['+', '-'])
        .context("missing position, expected WxH+X+Y")?;
    let (height, offsets) = rest.split_at(split);

    let width: f64 = width.parse().context("bad width")?;
    let height: f64 = height.parse().context("bad height")?;
    if width <= 0.0 || height <= 0.0 {
        bail!("display size must be positive");
    }

    let (x, y) = split_offsets(offsets).context("expected two offsets, like +0+0")?;
    Ok(Rect::new(x, y, width, height))
}

fn split_offsets(offsets: &str) -> Option<(f64, f64)> {
    // The second offset starts at the first sign after the first character,
    // skipping a "+-" pair that spells a negative value.
    let body = offsets.strip_prefix('+').unwrap_or(offsets);
    let second = body
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == '+' || *c == '-')
        .map(|(i, _)| i)?;
    let (x, y) = body.split_at(second);
    let y = y.strip_prefix('+').unwrap_or(y);
    Some((x.parse().ok()?, y.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cursorhome_platform_core::DisplayId;

    #[test]
    fn test_parse_geometry() {
        assert_eq!(
            parse_geometry("1920x1080+0+0").unwrap(),
            Rect::new(0.0, 0.0, 1920.0, 1080.0)
        );
        assert_eq!(
            parse_geometry("1280x1024-1280+0").unwrap(),
            Rect::new(-1280.0, 0.0, 1280.0, 1024.0)
        );
        assert_eq!(
            parse_geometry("2560x1440+1920+-200").unwrap(),
            Rect::new(1920.0, -200.0, 2560.0, 1440.0)
        );
    }

    #[test]
    fn test_parse_geometry_rejects_garbage() {
        assert!(parse_geometry("1920x1080").is_err());
        assert!(parse_geometry("axb+0+0").is_err());
        assert!(parse_geometry("0x1080+0+0").is_err());
        assert!(parse_geometry("1920x1080+0").is_err());
    }

    #[test]
    fn test_default_topology() {
        let topology = topology_from_args(&[]).unwrap();
        assert_eq!(topology.displays().len(), 1);
        assert_eq!(topology.primary().unwrap().bounds.width, 1920.0);
    }

    #[test]
    fn test_first_display_is_primary() {
        let specs = vec!["1920x1080+0+0".to_string(), "1920x1080+1920+0".to_string()];
        let topology = topology_from_args(&specs).unwrap();
        assert_eq!(topology.primary().unwrap().id, DisplayId(0));
        assert_eq!(topology.get(DisplayId(1)).unwrap().bounds.x, 1920.0);
    }
}
