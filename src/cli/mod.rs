//! CLI module for Holocron
//!
//! Drives the progression engine against records stored on disk:
//! - Records: create, inspect, grant experience, reset
//! - Abilities: browse the catalog, unlock and forget
//! - Presets: save, load, toggle and delete loadouts
//! - Apprentices: assign, tick, release and capacity changes

use crate::settings::AppConfig;
use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use holocron_core::{
    AbilityTable, AgentId, AttunementAxis, Error, ForceUser, ProgressionConfig, RecordStore,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub mod abilities;
pub mod apprentice;
pub mod console_host;
pub mod preset;
pub mod record;

use console_host::ConsoleHost;

/// Holocron CLI
#[derive(Parser, Debug)]
#[command(name = "holocron")]
#[command(about = "Force progression engine for simulation agents")]
#[command(version)]
pub struct Cli {
    /// Seed for reproducible rolls
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Print events as JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    #[command(flatten)]
    pub host: HostArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Traits and conditions the console host reports for every agent
#[derive(Args, Debug, Default, Clone)]
pub struct HostArgs {
    /// Trait the agent has (repeatable)
    #[arg(long = "trait", value_name = "TRAIT", global = true)]
    pub traits: Vec<String>,

    /// Condition the agent is under (repeatable)
    #[arg(long = "condition", value_name = "CONDITION", global = true)]
    pub conditions: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a progression record
    Create {
        agent: String,
        /// Display name (defaults to the agent id)
        #[arg(long)]
        name: Option<String>,
    },
    /// Show an agent's progression
    Show { agent: String },
    /// List stored agents
    List,
    /// Delete a record, dissolving its apprenticeships
    Delete { agent: String },
    /// Grant experience
    Xp { agent: String, amount: f32 },
    /// Grant levels outright
    LevelUp {
        agent: String,
        #[arg(default_value_t = 1)]
        levels: u32,
    },
    /// Grant ability points
    GrantPoints { agent: String, points: u32 },
    /// Spend force points
    Spend { agent: String, amount: f32 },
    /// Run force recovery intervals
    Recover {
        agent: String,
        #[arg(long, default_value_t = 1)]
        intervals: u32,
    },
    /// Reset all progression
    Reset { agent: String },
    /// Change an attunement meter
    Align {
        agent: String,
        axis: AxisArg,
        op: AlignOp,
        value: f32,
    },
    /// Ability catalog and unlocks
    #[command(subcommand)]
    Ability(AbilityCommands),
    /// Loadout presets
    #[command(subcommand)]
    Preset(PresetCommands),
    /// Master/apprentice relationships
    #[command(subcommand)]
    Apprentice(ApprenticeCommands),
    /// Print the effective configuration
    Config,
}

#[derive(Subcommand, Debug)]
pub enum AbilityCommands {
    /// List the catalog, optionally against one agent
    List {
        #[arg(long)]
        agent: Option<String>,
    },
    /// Unlock an ability
    Unlock { agent: String, ability: String },
    /// Remove an unlocked ability
    Forget { agent: String, ability: String },
}

#[derive(Subcommand, Debug)]
pub enum PresetCommands {
    /// List presets
    List { agent: String },
    /// Save the current loadout under a new name
    Save { agent: String, name: String },
    /// Switch to a preset
    Load { agent: String, name: String },
    /// Delete a preset
    Delete { agent: String, name: String },
    /// Activate or deactivate an ability in the current preset
    Toggle {
        agent: String,
        ability: String,
        /// Deactivate instead of activate
        #[arg(long)]
        off: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ApprenticeCommands {
    /// Assign an apprentice to a master
    Assign { master: String, apprentice: String },
    /// Dismiss an apprentice
    Release { apprentice: String },
    /// Advance every apprenticeship
    Tick {
        /// In-game days to advance
        #[arg(long, default_value_t = 1, conflicts_with = "ticks")]
        days: u32,
        /// Raw ticks to advance
        #[arg(long)]
        ticks: Option<u32>,
    },
    /// Report a master's death
    Killed {
        master: String,
        #[arg(long)]
        killer: Option<String>,
    },
    /// Change apprentice capacity for every current master
    Capacity { capacity: u32 },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum AxisArg {
    Light,
    Dark,
}

impl From<AxisArg> for AttunementAxis {
    fn from(axis: AxisArg) -> Self {
        match axis {
            AxisArg::Light => AttunementAxis::Light,
            AxisArg::Dark => AttunementAxis::Dark,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum AlignOp {
    Set,
    Add,
    Remove,
}

/// Everything a command needs
pub struct Session {
    pub config: AppConfig,
    pub store: RecordStore,
    pub catalog: AbilityTable,
    pub rng: StdRng,
    pub host: ConsoleHost,
}

impl Session {
    pub fn open(config: AppConfig, cli: &Cli) -> Result<Self> {
        let store = match &config.storage.data_dir {
            Some(dir) => RecordStore::with_path(dir),
            None => RecordStore::new(),
        };
        let catalog = crate::settings::load_catalog(&config.storage.abilities_file)?;
        let rng = match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let host = ConsoleHost::new(&cli.host.traits, &cli.host.conditions, cli.json);

        Ok(Self {
            config,
            store,
            catalog,
            rng,
            host,
        })
    }

    pub fn progression(&self) -> &ProgressionConfig {
        &self.config.progression
    }

    /// Load a stored record and resync its abilities on the host
    ///
    /// Fails with [`Error::UnknownAgent`] when there is no record.
    pub fn load_user(&mut self, agent: &str) -> Result<ForceUser> {
        let id = AgentId::from(agent);
        let user = self
            .store
            .load(&id, &self.config.progression)?
            .ok_or_else(|| Error::UnknownAgent(agent.to_string()))?;
        self.host.silently(|host| user.resync_abilities(host));
        Ok(user)
    }

    pub fn save_user(&self, user: &ForceUser) -> Result<()> {
        self.store.save(user.record())?;
        Ok(())
    }
}

/// Run the CLI command
pub fn run(cli: Cli, config: AppConfig) -> Result<()> {
    let Some(command) = cli.command.as_ref() else {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        cmd.print_help()?;
        println!();
        return Ok(());
    };

    let mut session = Session::open(config, &cli)?;
    match command {
        Commands::Create { agent, name } => record::create(&mut session, agent, name.as_deref()),
        Commands::Show { agent } => record::show(&mut session, agent),
        Commands::List => record::list(&session),
        Commands::Delete { agent } => record::delete(&mut session, agent),
        Commands::Xp { agent, amount } => record::add_experience(&mut session, agent, *amount),
        Commands::LevelUp { agent, levels } => record::level_up(&mut session, agent, *levels),
        Commands::GrantPoints { agent, points } => {
            record::grant_points(&mut session, agent, *points)
        }
        Commands::Spend { agent, amount } => record::spend(&mut session, agent, *amount),
        Commands::Recover { agent, intervals } => {
            record::recover(&mut session, agent, *intervals)
        }
        Commands::Reset { agent } => record::reset(&mut session, agent),
        Commands::Align {
            agent,
            axis,
            op,
            value,
        } => record::align(&mut session, agent, (*axis).into(), *op, *value),
        Commands::Ability(cmd) => abilities::run(&mut session, cmd),
        Commands::Preset(cmd) => preset::run(&mut session, cmd),
        Commands::Apprentice(cmd) => apprentice::run(&mut session, cmd),
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&session.config)?);
            Ok(())
        }
    }
}
