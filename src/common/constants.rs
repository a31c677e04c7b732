/// An organisational group known to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group {
    pub id: i64,
    pub label: &'static str,
}

pub const GROUPS: [Group; 3] = [
    Group {
        id: 1,
        label: "BAJAS COPPEL",
    },
    Group {
        id: 2,
        label: "GRUPO EXPANSION",
    },
    Group {
        id: 3,
        label: "GRUPO FONDO",
    },
];

pub fn group_label(id: i64) -> Option<&'static str> {
    GROUPS.iter().find(|g| g.id == id).map(|g| g.label)
}

/// Cycles "all groups" → 1 → 2 → 3 → "all groups".
pub fn next_group(current: Option<i64>) -> Option<i64> {
    match current {
        None => GROUPS.first().map(|g| g.id),
        Some(id) => {
            let idx = GROUPS.iter().position(|g| g.id == id)?;
            GROUPS.get(idx + 1).map(|g| g.id)
        }
    }
}

pub const GROUP_STATS_DAYS: u32 = 30;
pub const TOP_DISCONNECTED_LIMIT: u32 = 10;
