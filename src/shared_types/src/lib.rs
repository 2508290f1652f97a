//! Generated TypeScript bindings for the provisioning core live in `generated/`.
