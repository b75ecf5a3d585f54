pub const USAGE: &str = "\
Usage: tps-lanes [--config <file.json>] [--seed <n>] [--log <file>]
                 [--svg <out.svg> [--frames <n>]]";

const DEFAULT_SNAPSHOT_FRAMES: u32 = 120;

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub config: Option<String>,
    pub seed: Option<u64>,
    pub log: Option<String>,
    /// Write one SVG frame here instead of opening the terminal UI.
    pub svg: Option<String>,
    pub frames: u32,
}

impl Args {
    pub fn parse<I: Iterator<Item = String>>(mut args: I) -> Result<Self, String> {
        let mut parsed = Args {
            config: None,
            seed: None,
            log: None,
            svg: None,
            frames: DEFAULT_SNAPSHOT_FRAMES,
        };
        while let Some(flag) = args.next() {
            let mut value = || args.next().ok_or_else(|| format!("{flag} needs a value"));
            match flag.as_str() {
                "--config" => parsed.config = Some(value()?),
                "--log" => parsed.log = Some(value()?),
                "--svg" => parsed.svg = Some(value()?),
                "--seed" => {
                    let raw = value()?;
                    parsed.seed = Some(raw.parse().map_err(|_| format!("invalid seed: {raw}"))?);
                }
                "--frames" => {
                    let raw = value()?;
                    parsed.frames = raw.parse().map_err(|_| format!("invalid frame count: {raw}"))?;
                }
                other => return Err(format!("unknown argument: {other}")),
            }
        }
        Ok(parsed)
    }
}
