use anyhow::Result;
use crux_core::typegen::TypeGen;
use homething_provisioning_core::{
    events::{FormEvent, UiEvent, WifiEvent},
    types::{InputKind, NetworkOption, Widget},
    App, TimerKind, TimerOutput, WireFormat,
};
use std::path::PathBuf;

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=../app");

    let mut gen = TypeGen::new();

    gen.register_app::<App>()?;

    // Domain event enums, so every variant is traced
    gen.register_type::<FormEvent>()?;
    gen.register_type::<WifiEvent>()?;
    gen.register_type::<UiEvent>()?;

    // View enums only reachable through the model
    gen.register_type::<Widget>()?;
    gen.register_type::<InputKind>()?;
    gen.register_type::<NetworkOption>()?;
    gen.register_type::<WireFormat>()?;
    gen.register_type::<TimerKind>()?;
    gen.register_type::<TimerOutput>()?;

    let output_root = PathBuf::from("./generated");

    gen.typescript("shared_types", output_root.join("typescript"))?;

    Ok(())
}
