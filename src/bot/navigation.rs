//! Navigation action identifiers carried in button callback data

/// A routed navigation action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    /// `module:<name>`: open a module's detail screen
    Module(String),
    /// `page:<n>`: show page `n` of the help menu
    Page(usize),
    /// `back:help`: return from a module to the help menu
    BackToHelp,
    /// `back:start`: return to the last start screen
    BackToStart,
    /// `show:help`: open the help menu from a start screen
    ShowHelp,
    /// Anything else; left to the caller
    Unknown(String),
}

impl NavAction {
    /// Parse callback data into an action
    pub fn parse(data: &str) -> Self {
        match data {
            "back:help" => return NavAction::BackToHelp,
            "back:start" => return NavAction::BackToStart,
            "show:help" => return NavAction::ShowHelp,
            _ => {}
        }

        if let Some(name) = data.strip_prefix("module:") {
            if !name.is_empty() {
                return NavAction::Module(name.to_string());
            }
        } else if let Some(page) = data.strip_prefix("page:") {
            if let Ok(page) = page.parse::<usize>() {
                return NavAction::Page(page);
            }
        }

        NavAction::Unknown(data.to_string())
    }

    /// Callback data for this action
    pub fn encode(&self) -> String {
        match self {
            NavAction::Module(name) => format!("module:{name}"),
            NavAction::Page(page) => format!("page:{page}"),
            NavAction::BackToHelp => "back:help".to_string(),
            NavAction::BackToStart => "back:start".to_string(),
            NavAction::ShowHelp => "show:help".to_string(),
            NavAction::Unknown(data) => data.clone(),
        }
    }
}
