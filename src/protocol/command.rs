//! Command parsing for the monitor line protocol.

/// A single request line, decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Hello,
    Cpu,
    Mem,
    Bye,
    Invalid,
}

impl Command {
    /// Decode one line. Matching is case-insensitive and otherwise exact.
    pub fn parse(line: &[u8]) -> Self {
        const TABLE: [(&[u8], Command); 5] = [
            (b"HELLO", Command::Hello),
            (b"CPU", Command::Cpu),
            (b"MEM", Command::Mem),
            (b"BYE", Command::Bye),
            (b"QUIT", Command::Bye),
        ];

        TABLE
            .iter()
            .find(|(name, _)| line.eq_ignore_ascii_case(name))
            .map(|(_, cmd)| *cmd)
            .unwrap_or(Command::Invalid)
    }

    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Hello => "hello",
            Command::Cpu => "cpu",
            Command::Mem => "mem",
            Command::Bye => "bye",
            Command::Invalid => "invalid",
        }
    }
}

/// Format a utilization figure the way CPU and MEM replies carry it.
pub fn format_percent(pct: f64) -> String {
    let pct = if pct.is_finite() { pct.clamp(0.0, 100.0) } else { 0.0 };
    format!("{:.2}\n", pct)
}
