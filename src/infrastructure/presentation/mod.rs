pub mod alert;
pub mod console;
pub mod dashboard_server;
pub mod terminal_view;
