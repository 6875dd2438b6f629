use std::path::PathBuf;

use clap::Parser;

const KEYS: &str = "Keys while running (type, then Enter):
  s  start / pause     r  reset
  j  ambient tones     +/-  longer / shorter
  ?  print state       h  help     q  quit";

#[derive(Debug, Parser)]
#[command(name = "kitchen", version, about = "Recipe cooking timer with ambient tones")]
#[command(after_help = KEYS)]
pub struct Args {
    /// Recipe number from --list (starting at 1)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub recipe: Option<u32>,

    /// Countdown length in minutes, overriding the recipe
    #[arg(long)]
    pub minutes: Option<u32>,

    /// List the recipe catalogue and exit
    #[arg(long)]
    pub list: bool,

    /// Render the completion chime to a WAV file and exit
    #[arg(long, value_name = "PATH")]
    pub render_chime: Option<PathBuf>,

    /// Render one ambient chord to a WAV file and exit
    #[arg(long, value_name = "PATH")]
    pub render_chord: Option<PathBuf>,

    /// Seed for chord generation, for reproducible sessions
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the effective config back to the config file
    #[arg(long)]
    pub save_config: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn renders(&self) -> bool {
        self.render_chime.is_some() || self.render_chord.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("kitchen").chain(args.iter().copied()))
    }

    #[test]
    fn test_no_arguments() {
        let args = parse(&[]).expect("parse");
        assert_eq!(args.recipe, None);
        assert_eq!(args.minutes, None);
        assert!(!args.list);
        assert!(!args.renders());
        assert!(!args.verbose);
    }

    #[test]
    fn test_all_flags() {
        let args = parse(&[
            "--recipe", "2", "--minutes", "12", "--seed", "99", "--render-chord", "chord.wav",
            "--save-config", "-v",
        ])
        .expect("parse");
        assert_eq!(args.recipe, Some(2));
        assert_eq!(args.minutes, Some(12));
        assert_eq!(args.seed, Some(99));
        assert_eq!(args.render_chord, Some(PathBuf::from("chord.wav")));
        assert!(args.save_config);
        assert!(args.verbose);
        assert!(args.renders());
        assert!(!args.list);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse(&["--recipe"]).is_err());
        assert!(parse(&["--recipe", "0"]).is_err());
        assert!(parse(&["--minutes", "ten"]).is_err());
        assert!(parse(&["--frobnicate"]).is_err());
    }

    #[test]
    fn test_command_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
