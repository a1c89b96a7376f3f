pub mod diagram;
pub mod draw;
pub mod layout;
pub mod screens;
pub mod theme;
pub mod widgets;
