use anyhow::{anyhow, bail, Context, Result};
use halo_core::{Point, UiState};
use halo_engine::UiCommand;

/// One scripted command and the second it fires at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptEvent {
    pub at: f32,
    pub command: UiCommand,
}

/// Parse `command@seconds` items separated by commas.
///
/// Commands: `start`, `stop`, `answer`, a state name (`idle`, `thinking`,
/// `answered`) or `tap:XxY` with pixel coordinates. Events come back sorted
/// by time; ties keep their written order.
pub fn parse_script(script: &str) -> Result<Vec<ScriptEvent>> {
    let mut events = Vec::new();
    for item in script.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (name, at) = item
            .rsplit_once('@')
            .ok_or_else(|| anyhow!("script item `{item}` is missing `@seconds`"))?;
        let at: f32 = at
            .trim()
            .parse()
            .with_context(|| format!("bad time in script item `{item}`"))?;
        if !at.is_finite() || at < 0.0 {
            bail!("script time must be a non-negative number, got `{item}`");
        }
        events.push(ScriptEvent { at, command: parse_command(name.trim())? });
    }
    events.sort_by(|a, b| a.at.total_cmp(&b.at));
    Ok(events)
}

fn parse_command(name: &str) -> Result<UiCommand> {
    if let Some(coords) = name.strip_prefix("tap:") {
        let (x, y) = coords
            .split_once('x')
            .ok_or_else(|| anyhow!("tap needs `XxY` coordinates, got `{coords}`"))?;
        let x: f32 = x.parse().with_context(|| format!("bad tap x `{x}`"))?;
        let y: f32 = y.parse().with_context(|| format!("bad tap y `{y}`"))?;
        return Ok(UiCommand::Tap { origin: Point::new(x, y) });
    }
    match name.to_ascii_lowercase().as_str() {
        "start" => Ok(UiCommand::Start),
        "stop" => Ok(UiCommand::Stop),
        "answer" => Ok(UiCommand::Answer),
        other => UiState::from_name(other)
            .map(UiCommand::SetState)
            .ok_or_else(|| anyhow!("unknown script command `{name}`")),
    }
}
