use serde::{Deserialize, Serialize};

/// Functional color coding plus the font used for labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub background: String,
    pub text_color: String,
    pub node_color: String,
    pub highlight_color: String,
    pub root_color: String,
    pub edge_color: String,
    pub error_color: String,
    pub back_button_color: String,
    pub back_arrow_color: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "Arial, sans-serif".to_string(),
            background: "#ffffff".to_string(),
            text_color: "#333".to_string(),
            node_color: "#4a90e2".to_string(),
            highlight_color: "#ff6b6b".to_string(),
            root_color: "#ff9f43".to_string(),
            edge_color: "#aaa".to_string(),
            error_color: "#ff0000".to_string(),
            back_button_color: "#4a90e2".to_string(),
            back_arrow_color: "white".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            background: "#FFFFFF".to_string(),
            text_color: "#1C2430".to_string(),
            node_color: "#5B7DB1".to_string(),
            highlight_color: "#E4606D".to_string(),
            root_color: "#F2A541".to_string(),
            edge_color: "#C7D2E5".to_string(),
            error_color: "#C62828".to_string(),
            back_button_color: "#5B7DB1".to_string(),
            back_arrow_color: "#FFFFFF".to_string(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "classic" | "default" => Some(Self::classic()),
            "modern" => Some(Self::modern()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
