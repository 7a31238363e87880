pub mod card_grid;
pub mod detail_modal;
pub mod lookup_prompt;
pub mod search_bar;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use card_grid::{CardGrid, CardGridProps};
pub use detail_modal::{DetailModal, DetailModalProps};
pub use lookup_prompt::{LookupPrompt, LookupPromptProps};
pub use search_bar::{SearchBar, SearchBarProps};
