use std::path::PathBuf;

pub const USAGE: &str = "\
usage: cadenza [command]

commands:
  import <path>...   copy audio files (or directories of them) into the library
  list               show the library, most recently imported first
  delete <id>        remove a track and its stored file
  play [id]          interactive player (default command)
  config             print the effective configuration as TOML
  help               show this message

player keys:
  space/p  play/pause     s  stop        l/n  next      h/b  previous
  L / H    scrub +/-      d  delete      q    quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Import(Vec<PathBuf>),
    List,
    Delete(i64),
    Play(Option<i64>),
    Config,
    Help,
}

fn parse_id(raw: &str) -> Result<i64, String> {
    raw.parse::<i64>()
        .map_err(|_| format!("invalid track id: {raw}"))
}

/// Parse the arguments after the program name.
pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Command, String> {
    let mut args = args.into_iter();
    let Some(cmd) = args.next() else {
        return Ok(Command::Play(None));
    };
    let rest: Vec<String> = args.collect();

    match cmd.as_str() {
        "import" | "add" => {
            if rest.is_empty() {
                return Err("import needs at least one path".to_string());
            }
            Ok(Command::Import(rest.into_iter().map(PathBuf::from).collect()))
        }
        "list" | "ls" => Ok(Command::List),
        "delete" | "rm" => match rest.as_slice() {
            [id] => Ok(Command::Delete(parse_id(id)?)),
            _ => Err("delete needs exactly one track id".to_string()),
        },
        "play" => match rest.as_slice() {
            [] => Ok(Command::Play(None)),
            [id] => Ok(Command::Play(Some(parse_id(id)?))),
            _ => Err("play takes at most one track id".to_string()),
        },
        "config" => Ok(Command::Config),
        "help" | "-h" | "--help" => Ok(Command::Help),
        other => Err(format!("unknown command: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arguments_means_play() {
        assert_eq!(parse(args(&[])), Ok(Command::Play(None)));
        assert_eq!(parse(args(&["play", "7"])), Ok(Command::Play(Some(7))));
    }

    #[test]
    fn import_collects_every_path() {
        assert_eq!(
            parse(args(&["import", "a.mp3", "dir"])),
            Ok(Command::Import(vec!["a.mp3".into(), "dir".into()]))
        );
        assert!(parse(args(&["import"])).is_err());
    }

    #[test]
    fn delete_requires_a_numeric_id() {
        assert_eq!(parse(args(&["delete", "12"])), Ok(Command::Delete(12)));
        assert!(parse(args(&["delete", "x"])).is_err());
        assert!(parse(args(&["delete"])).is_err());
        assert!(parse(args(&["rm", "1", "2"])).is_err());
    }

    #[test]
    fn unknown_commands_are_rejected() {
        assert_eq!(parse(args(&["ls"])), Ok(Command::List));
        assert_eq!(parse(args(&["--help"])), Ok(Command::Help));
        assert_eq!(parse(args(&["config"])), Ok(Command::Config));
        assert!(parse(args(&["dance"])).is_err());
    }
}
