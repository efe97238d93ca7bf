//! LINAK command table
//!
//! Maps the 6-bit protected identifier of a frame to the command it carries.

/// Name returned for identifiers outside the command table
pub const UNKNOWN_COMMAND: &str = "invalid_command";

/// Command names indexed by protected identifier
static COMMANDS: [&str; 45] = [
    "Ref1 Position and status",
    "Ref2 Position and status",
    "Ref3 Position and status",
    "Ref4 Position and status",
    "Ref5 Position and status",
    "Ref6 Position and status",
    "Ref7 Position and status",
    "Ref8 Position and status",
    "Master reference output",
    "Undefined",
    // 10
    "Ref1 Input",
    "Ref2 Input",
    "Ref3 Input",
    "Ref4 Input",
    "Set compare serial #",
    "Get compare result",
    "Define slave #",
    "Enter boot load mode",
    "Slave 1 reference response",
    "Slave 2 reference response",
    // 20
    "Slave 3 reference response",
    "Master bed reference outputs",
    "Slave 1 bed reference outputs",
    "Slave 2 bed reference outputs",
    "Slave 3 bed reference outputs",
    "Undefined",
    "Undefined",
    "Master serial",
    "Diagnostic message",
    "Twindrive slave 1 max speeds, status and positions",
    // 30
    "Twindrive reference info",
    "Twindrive slave 0 max speeds",
    "Twindrave slave serial",
    "Undefined",
    "Undefined",
    "(backwards compatibilty)",
    "Request power",
    "Handset 1 command",
    "Handset 2 command",
    "Handset 1 safety sequence",
    // 40
    "Handset 2 safety sequence",
    "Config request",
    "Config response",
    "Config take control",
    "--Unspecced--",
];

/// Look up the display name of a command
///
/// Total over all integers: anything outside 0..=44 returns [`UNKNOWN_COMMAND`].
pub fn command_name(pid: i64) -> &'static str {
    usize::try_from(pid)
        .ok()
        .and_then(|index| COMMANDS.get(index))
        .copied()
        .unwrap_or(UNKNOWN_COMMAND)
}

/// Check if a protected identifier is present in the command table
pub fn is_known_command(pid: i64) -> bool {
    command_name(pid) != UNKNOWN_COMMAND
}
