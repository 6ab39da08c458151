//! Input line parsing.
//!
//! Lines starting with `/` are commands; anything else is chat. Parsing is
//! pure so the whole grammar is testable without a connection.

use thiserror::Error;

/// A parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `/present` claims the presenter role
    Present,
    /// `/release` releases the presenter role
    Release,
    /// `/add <url>` appends a video to the queue
    Add(String),
    /// `/move <entry_id> <order>` moves a queue entry
    Move { entry_id: u64, to_order: usize },
    /// `/rm <entry_id>` removes a queue entry
    Remove(u64),
    /// `/play` resumes playback (presenter only)
    Play,
    /// `/pause` pauses playback (presenter only)
    Pause,
    /// `/seek <seconds>` jumps to a position (presenter only)
    Seek(f64),
    /// `/vol <0.0..=1.0>` sets the volume (presenter only)
    Volume(f64),
    /// `/queue` prints the local queue view
    ShowQueue,
    /// Plain text: an ephemeral chat message
    Chat(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Try /present, /add, /move, /rm, /play, /pause, /seek, /vol, /queue")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

/// Parse an input line into a [`Command`]
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if !line.starts_with('/') {
        return Ok(Command::Chat(line.to_string()));
    }

    let mut parts = line.split_whitespace();
    let head = parts.next().unwrap_or_default();
    match head {
        "/present" => Ok(Command::Present),
        "/release" => Ok(Command::Release),
        "/add" => {
            // the url is everything after the command word
            let url = line["/add".len()..].trim();
            if url.is_empty() {
                return Err(CommandError::Usage("/add <url>"));
            }
            Ok(Command::Add(url.to_string()))
        }
        "/move" => {
            let entry_id = parts
                .next()
                .and_then(|s| s.parse::<u64>().ok())
                .ok_or(CommandError::Usage("/move <entry_id> <order>"))?;
            let to_order = parts
                .next()
                .and_then(|s| s.parse::<usize>().ok())
                .ok_or(CommandError::Usage("/move <entry_id> <order>"))?;
            Ok(Command::Move { entry_id, to_order })
        }
        "/rm" => {
            let entry_id = parts
                .next()
                .and_then(|s| s.parse::<u64>().ok())
                .ok_or(CommandError::Usage("/rm <entry_id>"))?;
            Ok(Command::Remove(entry_id))
        }
        "/play" => Ok(Command::Play),
        "/pause" => Ok(Command::Pause),
        "/seek" => {
            let seconds = parts
                .next()
                .and_then(|s| s.parse::<f64>().ok())
                .ok_or(CommandError::Usage("/seek <seconds>"))?;
            Ok(Command::Seek(seconds))
        }
        "/vol" => {
            let volume = parts
                .next()
                .and_then(|s| s.parse::<f64>().ok())
                .ok_or(CommandError::Usage("/vol <0.0..=1.0>"))?;
            Ok(Command::Volume(volume))
        }
        "/queue" => Ok(Command::ShowQueue),
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_chat() {
        // テスト項目: スラッシュで始まらない行がチャットとして解釈される
        // given (前提条件):
        let line = "hello everyone";

        // when (操作):
        let result = parse_command(line);

        // then (期待する結果):
        assert_eq!(result, Ok(Command::Chat("hello everyone".to_string())));
    }

    #[test]
    fn test_parse_queue_commands() {
        // テスト項目: キュー操作コマンドが正しくパースされる
        // given (前提条件):

        // when (操作) / then (期待する結果):
        assert_eq!(
            parse_command("/add https://example.com/v1"),
            Ok(Command::Add("https://example.com/v1".to_string()))
        );
        assert_eq!(
            parse_command("/move 3 0"),
            Ok(Command::Move {
                entry_id: 3,
                to_order: 0
            })
        );
        assert_eq!(parse_command("/rm 2"), Ok(Command::Remove(2)));
    }

    #[test]
    fn test_parse_playback_commands() {
        // テスト項目: 再生操作コマンドが正しくパースされる
        // given (前提条件):

        // when (操作) / then (期待する結果):
        assert_eq!(parse_command("/play"), Ok(Command::Play));
        assert_eq!(parse_command("/pause"), Ok(Command::Pause));
        assert_eq!(parse_command("/seek 42.5"), Ok(Command::Seek(42.5)));
        assert_eq!(parse_command("/vol 0.8"), Ok(Command::Volume(0.8)));
    }

    #[test]
    fn test_parse_role_commands() {
        // テスト項目: ロール操作コマンドが正しくパースされる
        // given (前提条件):

        // when (操作) / then (期待する結果):
        assert_eq!(parse_command("/present"), Ok(Command::Present));
        assert_eq!(parse_command("/release"), Ok(Command::Release));
    }

    #[test]
    fn test_missing_argument_is_a_usage_error() {
        // テスト項目: 引数が不足しているコマンドが Usage エラーになる
        // given (前提条件):

        // when (操作) / then (期待する結果):
        assert_eq!(parse_command("/add"), Err(CommandError::Usage("/add <url>")));
        assert_eq!(
            parse_command("/move 3"),
            Err(CommandError::Usage("/move <entry_id> <order>"))
        );
        assert_eq!(
            parse_command("/seek fast"),
            Err(CommandError::Usage("/seek <seconds>"))
        );
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        // テスト項目: 未知のスラッシュコマンドが拒否される
        // given (前提条件):
        let line = "/dance";

        // when (操作):
        let result = parse_command(line);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(CommandError::UnknownCommand("/dance".to_string()))
        );
    }

    #[test]
    fn test_add_keeps_url_with_spaces() {
        // テスト項目: /add の url 引数が空白を含んでも丸ごと保持される
        // given (前提条件):
        let line = "/add my local file.mp4";

        // when (操作):
        let result = parse_command(line);

        // then (期待する結果):
        assert_eq!(result, Ok(Command::Add("my local file.mp4".to_string())));
    }
}
