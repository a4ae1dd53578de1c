use playground_example::{handler, AppConfig};

pub fn main() {
    env_logger::init();
    trillium_smol::run(handler(AppConfig::from_env()));
}
