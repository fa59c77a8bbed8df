pub mod toml_config_repository;

pub use self::toml_config_repository::TomlConfigRepository;
