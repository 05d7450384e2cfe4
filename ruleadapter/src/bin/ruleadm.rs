use casbin::{
    Adapter,
    CoreApi,
    DefaultModel,
    Enforcer,
    Model,
};
use clap::{
    Parser,
    Subcommand,
};
use ruleadapter::RuleAdapter;
use rulecore::{
    platform::ConnectorOption,
    rule::{
        parse_policy_line,
        section_of,
    },
    traits::RuleBackend,
};
use ruledb_mongo::MongoBackend;
use std::{
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

#[derive(Debug, Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[clap(long, value_name = "RULEDB_URL", env = "RULEDB_URL")]
    ruledb_url: String,
    /// Database to use instead of the one named in the URL
    #[clap(long, env = "RULEDB_DATABASE")]
    database: Option<String>,
    #[clap(long, env = "RULEDB_COLLECTION")]
    collection: Option<String>,
    /// Bound every operation to this many seconds
    #[clap(long, value_name = "SECONDS")]
    timeout: Option<u64>,
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List every stored rule
    List {
        #[arg(long)]
        json: bool,
    },
    #[command(arg_required_else_help = true)]
    Add {
        ptype: String,
        values: Vec<String>,
    },
    #[command(arg_required_else_help = true)]
    Remove {
        ptype: String,
        values: Vec<String>,
    },
    /// Remove every rule whose values starting at the field index match
    #[command(arg_required_else_help = true)]
    RemoveFiltered {
        ptype: String,
        field_index: usize,
        values: Vec<String>,
    },
    /// Replace the stored rules with the policy file
    #[command(arg_required_else_help = true)]
    Import {
        model: PathBuf,
        policy: PathBuf,
    },
    /// Check a request against the stored policy
    #[command(arg_required_else_help = true)]
    Enforce {
        model: PathBuf,
        #[arg(required = true)]
        request: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();
    stderrlog::new()
        .module(module_path!())
        .module("ruleadapter")
        .module("ruledb_mongo")
        .verbosity((args.verbose as usize) + 1)
        .timestamp(stderrlog::Timestamp::Second)
        .init()
        .unwrap();

    let mut opts = ConnectorOption::from(args.ruledb_url);
    if let Some(database) = args.database {
        opts = opts.database(database);
    }
    if let Some(collection) = args.collection {
        opts = opts.collection(collection);
    }
    if let Some(timeout) = args.timeout {
        opts = opts.op_timeout(Duration::from_secs(timeout));
    }
    let backend = Arc::new(MongoBackend::connect(opts).await?);
    let result = run(args.command, backend.clone()).await;

    match Arc::try_unwrap(backend) {
        Ok(backend) => backend.close().await,
        Err(_) => log::warn!("backend still shared at exit; not closed"),
    }

    result
}

async fn run(
    command: Commands,
    backend: Arc<MongoBackend>,
) -> anyhow::Result<()> {
    match command {
        Commands::List { json } => {
            list(backend.as_ref(), json).await?;
        },
        Commands::Add { ptype, values } => {
            let sec = section_of(&ptype)?;
            RuleAdapter::new(backend)
                .add_policy(sec, &ptype, values)
                .await?;
        },
        Commands::Remove { ptype, values } => {
            let sec = section_of(&ptype)?;
            if !RuleAdapter::new(backend)
                .remove_policy(sec, &ptype, values)
                .await?
            {
                println!("no matching rule");
            }
        },
        Commands::RemoveFiltered { ptype, field_index, values } => {
            let sec = section_of(&ptype)?;
            if !RuleAdapter::new(backend)
                .remove_filtered_policy(sec, &ptype, field_index, values)
                .await?
            {
                println!("no matching rules");
            }
        },
        Commands::Import { model, policy } => {
            import(RuleAdapter::new(backend), model, policy).await?;
        },
        Commands::Enforce { model, request } => {
            enforce(RuleAdapter::new(backend), model, request).await?;
        },
    }
    Ok(())
}

async fn list(backend: &impl RuleBackend, json: bool) -> anyhow::Result<()> {
    let rules = backend.find_rules(&[]).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&rules)?);
    } else {
        for rule in rules.iter() {
            println!("{rule}");
        }
    }
    Ok(())
}

async fn import(
    mut adapter: RuleAdapter<Arc<MongoBackend>>,
    model: PathBuf,
    policy: PathBuf,
) -> anyhow::Result<()> {
    let mut model = DefaultModel::from_file(model).await?;
    let policy = tokio::fs::read_to_string(policy).await?;
    let mut skipped = 0;
    for (ptype, rule) in policy.lines().filter_map(parse_policy_line) {
        if !model.add_policy(section_of(&ptype)?, &ptype, rule) {
            skipped += 1;
        }
    }
    if skipped > 0 {
        log::warn!("{skipped} lines not accepted by the model");
    }
    adapter.save_policy(&mut model).await?;
    Ok(())
}

async fn enforce(
    adapter: RuleAdapter<Arc<MongoBackend>>,
    model: PathBuf,
    request: Vec<String>,
) -> anyhow::Result<()> {
    let model = DefaultModel::from_file(model).await?;
    let enforcer = Enforcer::new(model, adapter).await?;
    let allowed = enforcer.enforce(request)?;
    println!("{}", if allowed { "allow" } else { "deny" });
    Ok(())
}
