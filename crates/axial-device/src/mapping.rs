/// Display names for the physical axes and buttons of a device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    axes: Vec<String>,
    buttons: Vec<String>,
}

impl NameTable {
    /// Generic `Axis N` / `Button N` names, numbered from one.
    pub fn generic(axes: u16, buttons: u16) -> Self {
        Self {
            axes: (1..=axes).map(|i| format!("Axis {i}")).collect(),
            buttons: (1..=buttons).map(|i| format!("Button {i}")).collect(),
        }
    }

    /// Names from a game controller mapping string.
    ///
    /// The string uses the SDL layout `guid,name,a:b0,leftx:a0,dpup:h0.1,...`.
    /// Indices the mapping does not mention keep their generic name, so the
    /// table always covers every physical axis and button.
    pub fn from_mapping(mapping: &str, axes: u16, buttons: u16) -> Self {
        let mut table = Self::generic(axes, buttons);
        for field in mapping.split(',').skip(2) {
            let Some((target, source)) = field.split_once(':') else {
                continue;
            };
            let source = source.trim_start_matches(['+', '-']).trim_end_matches('~');
            let Some(kind) = source.chars().next() else {
                continue;
            };
            let Ok(index) = source[kind.len_utf8()..].parse::<usize>() else {
                continue;
            };
            let slot = match kind {
                'a' => table.axes.get_mut(index),
                'b' => table.buttons.get_mut(index),
                _ => None,
            };
            if let Some(slot) = slot {
                *slot = display_name(target).to_string();
            }
        }
        table
    }

    pub fn axis(&self, index: usize) -> Option<&str> {
        self.axes.get(index).map(String::as_str)
    }

    pub fn button(&self, index: usize) -> Option<&str> {
        self.buttons.get(index).map(String::as_str)
    }

    pub fn axis_index(&self, name: &str) -> Option<usize> {
        self.axes.iter().position(|n| n.eq_ignore_ascii_case(name))
    }

    pub fn button_index(&self, name: &str) -> Option<usize> {
        self.buttons.iter().position(|n| n.eq_ignore_ascii_case(name))
    }
}

fn display_name(target: &str) -> &str {
    match target {
        "a" => "A",
        "b" => "B",
        "x" => "X",
        "y" => "Y",
        "back" => "Back",
        "guide" => "Guide",
        "start" => "Start",
        "leftstick" => "Left Stick",
        "rightstick" => "Right Stick",
        "leftshoulder" => "Left Shoulder",
        "rightshoulder" => "Right Shoulder",
        "dpup" => "D-Pad Up",
        "dpdown" => "D-Pad Down",
        "dpleft" => "D-Pad Left",
        "dpright" => "D-Pad Right",
        "misc1" => "Misc",
        "paddle1" => "Paddle 1",
        "paddle2" => "Paddle 2",
        "paddle3" => "Paddle 3",
        "paddle4" => "Paddle 4",
        "touchpad" => "Touchpad",
        "leftx" => "Left Stick X",
        "lefty" => "Left Stick Y",
        "rightx" => "Right Stick X",
        "righty" => "Right Stick Y",
        "lefttrigger" => "Left Trigger",
        "righttrigger" => "Right Trigger",
        other => other,
    }
}
