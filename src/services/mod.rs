// Aurora Browser services
// Services provide the stateless core: site registry, URL resolution, load simulation, timers, settings.

pub mod loading_simulator;
pub mod navigation_resolver;
pub mod scheduler;
pub mod settings_engine;
pub mod sites;
pub mod website_registry;
