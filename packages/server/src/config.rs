//! Command line / environment configuration.

use std::time::Duration;

use clap::Parser;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "duelroom-server")]
#[command(about = "Two-player matchmaking and relay server", long_about = None)]
pub struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "8765")]
    pub port: u16,

    /// Seconds a joined connection may wait before sending ready (disabled when unset)
    #[arg(long, env = "READY_TIMEOUT_SECS")]
    pub ready_timeout_secs: Option<u64>,

    /// Default log level, overridden by RUST_LOG
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Ready handshake timeout, if enabled
    pub fn ready_timeout(&self) -> Option<Duration> {
        self.ready_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_arguments() {
        // テスト項目: コマンドライン引数が反映される
        // given (前提条件):
        let argv = [
            "duelroom-server",
            "--host",
            "127.0.0.1",
            "--port",
            "9000",
            "--ready-timeout-secs",
            "15",
            "--log-level",
            "debug",
        ];

        // when (操作):
        let args = Args::try_parse_from(argv).unwrap();

        // then (期待する結果):
        assert_eq!(args.host, "127.0.0.1");
        assert_eq!(args.port, 9000);
        assert_eq!(args.ready_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(args.log_level, "debug");
    }

    #[test]
    fn test_zero_timeout_disables_ready_deadline() {
        // テスト項目: 0 秒のタイムアウトは無効扱い
        // given (前提条件):
        let argv = ["duelroom-server", "--ready-timeout-secs", "0"];

        // when (操作):
        let args = Args::try_parse_from(argv).unwrap();

        // then (期待する結果):
        assert_eq!(args.ready_timeout(), None);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        // テスト項目: ポート番号として解釈できない値はエラー
        // given (前提条件):
        let argv = ["duelroom-server", "--port", "not-a-port"];

        // when (操作):
        let result = Args::try_parse_from(argv);

        // then (期待する結果):
        assert!(result.is_err());
    }
}
