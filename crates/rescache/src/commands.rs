//! Line-oriented command interface over the cached services

use anyhow::{Context, Result, bail};
use metrics_exporter_prometheus::PrometheusHandle;
use rescache_core::{CacheFactory, CacheStats, CachedService, ResourceKind, ResourceService};
use rescache_store::{NewProduct, NewUser, ProductService, UserService};
use serde::Serialize;
use std::str::FromStr;
use tracing::debug;

use crate::config::Config;

pub const HELP: &str = "\
Commands:
  get <users|products> <id>
  create users <username> <email>
  create products <name> <price_cents> <stock>
  update users <id> <username> <email>
  update products <id> <name> <price_cents> <stock>
  delete <users|products> <id>
  stats
  metrics
  config save <path>
  help
  quit";

/// Resource addressed by a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Users,
    Products,
}

impl FromStr for Resource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "users" | "user" => Ok(Resource::Users),
            "products" | "product" => Ok(Resource::Products),
            _ => bail!("Unknown resource: {}", s),
        }
    }
}

/// A parsed command line
#[derive(Debug, Clone)]
pub enum Command {
    Get(Resource, u64),
    CreateUser(NewUser),
    CreateProduct(NewProduct),
    UpdateUser(u64, NewUser),
    UpdateProduct(u64, NewProduct),
    Delete(Resource, u64),
    Stats,
    Metrics,
    SaveConfig(String),
    Help,
    Quit,
}

fn parse_id(raw: Option<&&str>) -> Result<u64> {
    let raw = raw.context("Missing id")?;
    raw.parse()
        .with_context(|| format!("Invalid id: {}", raw))
}

fn parse_user(args: &[&str]) -> Result<NewUser> {
    match args {
        [username, email] => Ok(NewUser {
            username: username.to_string(),
            email: email.to_string(),
        }),
        _ => bail!("Expected <username> <email>"),
    }
}

fn parse_product(args: &[&str]) -> Result<NewProduct> {
    match args {
        [name, price, stock] => Ok(NewProduct {
            name: name.to_string(),
            price_cents: price
                .parse()
                .with_context(|| format!("Invalid price: {}", price))?,
            stock: stock
                .parse()
                .with_context(|| format!("Invalid stock: {}", stock))?,
        }),
        _ => bail!("Expected <name> <price_cents> <stock>"),
    }
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();

        match words.as_slice() {
            ["get", resource, rest @ ..] => {
                Ok(Command::Get(resource.parse()?, parse_id(rest.first())?))
            }
            ["delete", resource, rest @ ..] => {
                Ok(Command::Delete(resource.parse()?, parse_id(rest.first())?))
            }
            ["create", resource, rest @ ..] => match resource.parse()? {
                Resource::Users => Ok(Command::CreateUser(parse_user(rest)?)),
                Resource::Products => Ok(Command::CreateProduct(parse_product(rest)?)),
            },
            ["update", resource, id, rest @ ..] => {
                let id = parse_id(Some(id))?;
                match resource.parse()? {
                    Resource::Users => Ok(Command::UpdateUser(id, parse_user(rest)?)),
                    Resource::Products => Ok(Command::UpdateProduct(id, parse_product(rest)?)),
                }
            }
            ["stats"] => Ok(Command::Stats),
            ["metrics"] => Ok(Command::Metrics),
            ["config", "save", path] => Ok(Command::SaveConfig(path.to_string())),
            ["help"] => Ok(Command::Help),
            ["quit"] | ["exit"] => Ok(Command::Quit),
            [] => bail!("Empty command"),
            _ => bail!("Unrecognized command: {}", line.trim()),
        }
    }
}

/// Per-resource report printed by `stats`
#[derive(Debug, Serialize)]
struct ResourceReport {
    #[serde(flatten)]
    cache: CacheStats,
    hit_ratio: f64,
    backend_calls: u64,
}

impl ResourceReport {
    fn new(cache: CacheStats, backend_calls: u64) -> Self {
        Self {
            hit_ratio: cache.hit_ratio(),
            cache,
            backend_calls,
        }
    }
}

/// Cached services composed at startup
pub struct App {
    config: Config,
    users: CachedService<UserService>,
    products: CachedService<ProductService>,
    metrics: Option<PrometheusHandle>,
}

impl App {
    /// Build one cache per resource and put it in front of its service
    pub fn new(config: Config, metrics: Option<PrometheusHandle>) -> Self {
        let factory = CacheFactory::new(&config.cache);

        let users = CachedService::new(
            UserService::new(),
            factory.create_cache(ResourceKind::USERS),
        );
        let products = CachedService::new(
            ProductService::new(),
            factory.create_cache(ResourceKind::PRODUCTS),
        );

        Self {
            config,
            users,
            products,
            metrics,
        }
    }

    /// Run one command, returning the text to print
    pub async fn execute(&self, command: Command) -> Result<String> {
        debug!("Executing {:?}", command);

        match command {
            Command::Get(Resource::Users, id) => to_json(&self.users.find(&id).await?),
            Command::Get(Resource::Products, id) => to_json(&self.products.find(&id).await?),
            Command::CreateUser(user) => to_json(&self.users.create(user).await?),
            Command::CreateProduct(product) => to_json(&self.products.create(product).await?),
            Command::UpdateUser(id, user) => to_json(&self.users.update(&id, user).await?),
            Command::UpdateProduct(id, product) => {
                to_json(&self.products.update(&id, product).await?)
            }
            Command::Delete(Resource::Users, id) => to_json(&self.users.delete(&id).await?),
            Command::Delete(Resource::Products, id) => to_json(&self.products.delete(&id).await?),
            Command::Stats => to_json(&self.reports()),
            Command::Metrics => match &self.metrics {
                Some(handle) => Ok(handle.render()),
                None => Ok("Metrics are disabled".to_string()),
            },
            Command::SaveConfig(path) => {
                self.config.save(&path)?;
                Ok(format!("Saved configuration to {}", path))
            }
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok(String::new()),
        }
    }

    fn reports(&self) -> Vec<ResourceReport> {
        vec![
            ResourceReport::new(self.users.cache().stats(), self.users.inner().backend_calls()),
            ResourceReport::new(
                self.products.cache().stats(),
                self.products.inner().backend_calls(),
            ),
        ]
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}
