pub mod publications;
