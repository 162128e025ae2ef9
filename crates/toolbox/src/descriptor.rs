/// Static identity of a tool, consumed by a host registry for discovery and
/// menu placement. The id doubles as the registry key and must stay stable
/// for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    pub group_id: &'static str,
    pub group_name: &'static str,
    pub help: &'static str,
}

impl ToolDescriptor {
    pub const fn new(
        id: &'static str,
        display_name: &'static str,
        group_id: &'static str,
        group_name: &'static str,
        help: &'static str,
    ) -> Self {
        ToolDescriptor {
            id,
            display_name,
            group_id,
            group_name,
            help,
        }
    }
}

impl std::fmt::Display for ToolDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.display_name, self.id)
    }
}
