pub mod asset_registrar;
pub mod capture_device;
pub mod preview_player;
pub mod recorder_delegate;
