use emblab::api::{ContainerLayout, Workbench, WorkbenchConfig};
use emblab::core::{ClassLabel, ComponentKey, PixelPoint, WeightChannel};
use emblab::interaction::{EllipseLayer, WeightDragMode};
use emblab::protocol::{ApplyOutcome, RecordingChannel};
use emblab::render::NullRenderer;
use emblab::telemetry::{DEFAULT_FILTER, init_tracing};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

const USAGE: &str =
    "usage: session_replay --input <events.jsonl> [--output <summary.json>] [--config <config.json>] [--log <filter>]";

#[derive(Debug)]
struct CliArgs {
    input: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    log: Option<String>,
}

/// One line of a recorded session.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum SessionEvent {
    Backend {
        message: Value,
    },
    WeightDrag {
        channel: WeightChannel,
        label: ClassLabel,
        #[serde(default = "default_drag_mode")]
        mode: WeightDragMode,
        xs: Vec<f64>,
    },
    EllipseDrag {
        label: ClassLabel,
        layer: EllipseLayer,
        path: Vec<PixelPoint>,
    },
    DrawComponent {
        path: Vec<PixelPoint>,
    },
    RemoveComponent {
        key: ComponentKey,
    },
    Highlight {
        feature: Option<usize>,
    },
    Save {
        name: String,
    },
    Load {
        name: String,
    },
    Resize {
        containers: ContainerLayout,
    },
    Tick {
        ms: u64,
    },
}

#[derive(Debug, Default, Serialize)]
struct ReplaySummary {
    events: usize,
    failed_events: usize,
    full_reloads: usize,
    incremental_updates: usize,
    save_list_updates: usize,
    requests_sent: u64,
    patches_applied: usize,
    live_components: usize,
    sent: Vec<Value>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let _ = init_tracing(args.log.as_deref().unwrap_or(DEFAULT_FILTER));

    let config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|err| format!("failed to read `{}`: {err}", path.display()))?;
            WorkbenchConfig::from_json_str(&raw).map_err(|err| err.to_string())?
        }
        None => WorkbenchConfig::default(),
    };
    let mut workbench = Workbench::new(config, NullRenderer::default(), RecordingChannel::new())
        .map_err(|err| err.to_string())?;

    let raw = fs::read_to_string(&args.input)
        .map_err(|err| format!("failed to read `{}`: {err}", args.input.display()))?;
    let mut summary = ReplaySummary::default();
    for (line_no, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event: SessionEvent = serde_json::from_str(line)
            .map_err(|err| format!("line {}: invalid event: {err}", line_no + 1))?;
        summary.events += 1;
        match replay_event(&mut workbench, event) {
            Ok(Some(ApplyOutcome::FullReload)) => summary.full_reloads += 1,
            Ok(Some(ApplyOutcome::Incremental)) => summary.incremental_updates += 1,
            Ok(Some(ApplyOutcome::SaveListUpdated)) => summary.save_list_updates += 1,
            Ok(None) => {}
            Err(err) => {
                summary.failed_events += 1;
                warn!(line = line_no + 1, error = %err, "event rejected");
            }
        }
    }

    summary.requests_sent = workbench.adapter().requests_sent();
    summary.live_components = workbench.components().live_count();
    summary.patches_applied = workbench.renderer().patches_applied;
    summary.sent = workbench
        .channel()
        .sent()
        .iter()
        .map(|message| serde_json::from_str(message).unwrap_or(Value::Null))
        .collect();

    let payload = serde_json::to_string_pretty(&summary)
        .map_err(|err| format!("failed to serialize json: {err}"))?;
    match &args.output {
        Some(path) => fs::write(path, payload)
            .map_err(|err| format!("failed to write `{}`: {err}", path.display())),
        None => {
            println!("{payload}");
            Ok(())
        }
    }
}

fn replay_event(
    workbench: &mut Workbench<NullRenderer, RecordingChannel>,
    event: SessionEvent,
) -> emblab::ViewResult<Option<ApplyOutcome>> {
    match event {
        SessionEvent::Backend { message } => {
            return workbench.handle_message(&message.to_string()).map(Some);
        }
        SessionEvent::WeightDrag {
            channel,
            label,
            mode,
            xs,
        } => {
            if let Some((&first, rest)) = xs.split_first() {
                workbench.weight_drag_start(channel, &label, mode, first)?;
                for &x in rest {
                    workbench.weight_drag_move(channel, &label, x)?;
                }
                let last = rest.last().copied().unwrap_or(first);
                workbench.weight_drag_end(channel, &label, last)?;
            }
        }
        SessionEvent::EllipseDrag { label, layer, path } => {
            if let Some((&first, rest)) = path.split_first() {
                if workbench.ellipse_drag_start(&label, layer, first)? {
                    for &point in rest {
                        workbench.ellipse_drag_move(&label, point)?;
                    }
                    let last = rest.last().copied().unwrap_or(first);
                    workbench.ellipse_drag_end(&label, last)?;
                }
            }
        }
        SessionEvent::DrawComponent { path } => {
            if let Some((&first, rest)) = path.split_first() {
                workbench.component_draw_start(first)?;
                for &point in rest {
                    workbench.component_draw_move(point)?;
                }
                let last = rest.last().copied().unwrap_or(first);
                workbench.component_draw_end(last)?;
            }
        }
        SessionEvent::RemoveComponent { key } => {
            workbench.remove_component(key)?;
        }
        SessionEvent::Highlight { feature } => workbench.highlight_feature(feature)?,
        SessionEvent::Save { name } => workbench.request_save(&name)?,
        SessionEvent::Load { name } => workbench.request_load(&name)?,
        SessionEvent::Resize { containers } => workbench.resize(containers)?,
        SessionEvent::Tick { ms } => {
            workbench.tick(ms);
        }
    }
    Ok(None)
}

fn default_drag_mode() -> WeightDragMode {
    WeightDragMode::Row
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);
    let mut input = None::<PathBuf>;
    let mut output = None::<PathBuf>;
    let mut config = None::<PathBuf>;
    let mut log = None::<String>;

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--input" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --input".to_owned())?;
                input = Some(PathBuf::from(value));
            }
            "--output" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --output".to_owned())?;
                output = Some(PathBuf::from(value));
            }
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --config".to_owned())?;
                config = Some(PathBuf::from(value));
            }
            "--log" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --log".to_owned())?;
                log = Some(value);
            }
            "--help" | "-h" => return Err(USAGE.to_owned()),
            other => return Err(format!("unknown argument `{other}`\n{USAGE}")),
        }
    }

    Ok(CliArgs {
        input: input.ok_or_else(|| USAGE.to_owned())?,
        output,
        config,
        log,
    })
}
