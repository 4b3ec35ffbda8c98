//! CLI entrypoint for Deck Advisor Core
//!
//! Wires every layer together via dependency injection and runs one
//! request through the orchestrator end to end, printing the result as
//! JSON.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use advisor_application::ports::{NullProgressNotifier, ProgressNotifier};
use advisor_application::{OrchestrateRequestUseCase, OrchestratorBudgets, SimulateDeckUseCase};
use advisor_domain::{CardCounts, Deck, MulliganStrategy, SimulationConfig, SubagentRequest};
use advisor_infrastructure::{
    load_card_pool, ConfigLoader, HttpLlmGateway, InMemoryCardStore, InMemoryCorpusRetriever,
    LruTtlResponseCache, LruTtlSimulationCache, MockLlmGateway, MonteCarloSimulator,
};
use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "deck-advisor", about = "Arkham Horror LCG deckbuilding advisor")]
struct Cli {
    /// Free-text question or request, e.g. "is this card legal in my deck?"
    message: String,

    /// Investigator code the request is about
    #[arg(long)]
    investigator: Option<String>,

    /// Deck contents as `code:qty,code:qty,...`
    #[arg(long)]
    deck: Option<String>,

    /// Scenario name, for scenario-preparation requests
    #[arg(long)]
    scenario: Option<String>,

    /// Path to a card pool JSON file (see `advisor_infrastructure::load_card_pool`)
    #[arg(long, default_value = "card_pool.json")]
    card_pool: PathBuf,

    /// Explicit config file, overriding project/global discovery
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the offline mock LLM gateway instead of calling out over HTTP
    #[arg(long)]
    offline: bool,

    /// Run the Monte Carlo deck simulator instead of the advisory orchestrator
    #[arg(long)]
    simulate: bool,

    /// Trial count override for --simulate
    #[arg(long)]
    trials: Option<u32>,

    /// Seed override for --simulate (otherwise a fresh seed is drawn and
    /// recorded in the report)
    #[arg(long)]
    seed: Option<u64>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_deck_cards(spec: &str) -> Result<CardCounts> {
    let mut cards = CardCounts::new();
    for entry in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (code, qty) = entry
            .split_once(':')
            .with_context(|| format!("expected code:qty, got `{entry}`"))?;
        cards.insert(code.to_string(), qty.parse()?);
    }
    Ok(cards)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    advisor_infrastructure::init_tracing(cli.verbose);
    info!("starting deck-advisor");

    let config = ConfigLoader::load(cli.config.as_ref()).context("loading configuration")?;

    let card_pool = load_card_pool(&cli.card_pool)
        .with_context(|| format!("loading card pool from {}", cli.card_pool.display()))?;
    info!(cards = card_pool.cards.len(), investigators = card_pool.investigators.len(), "loaded card pool");

    let cards_by_code: std::collections::BTreeMap<_, _> =
        card_pool.cards.iter().map(|c| (c.code.clone(), c.clone())).collect();
    let card_store = Arc::new(InMemoryCardStore::new(card_pool.cards, card_pool.investigators));
    let corpus = Arc::new(InMemoryCorpusRetriever::new(Vec::new(), config.retrieval.top_k));

    if cli.simulate {
        let deck = Deck {
            investigator_code: cli.investigator.clone(),
            cards: cli
                .deck
                .as_deref()
                .map(parse_deck_cards)
                .transpose()?
                .unwrap_or_default(),
            ..Deck::empty()
        };
        let sim_config = SimulationConfig {
            n_trials: cli.trials.unwrap_or(config.simulator.default_trials),
            turns: config.simulator.default_turns,
            mulligan_strategy: config.simulator.parse_mulligan_strategy(),
            seed: cli.seed,
            target_cards: None,
        };

        let simulator = Arc::new(MonteCarloSimulator::new());
        let sim_cache = Arc::new(LruTtlSimulationCache::new(
            config.subagent_cache.capacity_per_agent,
            Duration::from_secs(config.subagent_cache.ttl_secs),
        ));
        let use_case = SimulateDeckUseCase::new(simulator, sim_cache);
        let report = use_case.execute(&deck, &cards_by_code, &sim_config).await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let gateway: Arc<dyn advisor_application::ports::LlmGateway> = if cli.offline {
        Arc::new(MockLlmGateway)
    } else {
        Arc::new(HttpLlmGateway::new(
            config.llm.endpoint.clone(),
            config.llm.model.clone(),
            Duration::from_secs(config.llm.timeout_secs),
        )?)
    };

    let response_cache = Arc::new(LruTtlResponseCache::new(
        config.subagent_cache.capacity_per_agent,
        Duration::from_secs(config.subagent_cache.ttl_secs),
    ));

    let retries = config.orchestrator.synthesizer_retries;
    let rules = Arc::new(advisor_application::subagent::CachedSubagent::new(
        advisor_application::subagent::RetryingSubagent::new(
            advisor_application::subagent::RulesAgent::new(corpus.clone(), card_store.clone())
                .with_top_k(config.retrieval.top_k),
            retries.max(1),
        ),
        response_cache.clone(),
    ));
    let state = Arc::new(advisor_application::subagent::CachedSubagent::new(
        advisor_application::subagent::RetryingSubagent::new(
            advisor_application::subagent::StateAgent::new(card_store.clone()),
            retries.max(1),
        ),
        response_cache.clone(),
    ));
    let action_space = Arc::new(advisor_application::subagent::CachedSubagent::new(
        advisor_application::subagent::RetryingSubagent::new(
            advisor_application::subagent::ActionSpaceAgent::new(card_store.clone()).with_weights(
                config.action_space.top_k,
                config.action_space.alpha,
                config.action_space.beta,
                config.action_space.gamma,
                config.action_space.delta,
            ),
            retries.max(1),
        ),
        response_cache.clone(),
    ));
    let scenario = Arc::new(advisor_application::subagent::CachedSubagent::new(
        advisor_application::subagent::RetryingSubagent::new(
            advisor_application::subagent::ScenarioAgent::new(corpus.clone()),
            retries.max(1),
        ),
        response_cache,
    ));

    let budgets = OrchestratorBudgets {
        per_agent_timeout: Duration::from_secs(config.orchestrator.per_agent_timeout_secs),
        global_timeout: Duration::from_secs(config.orchestrator.global_timeout_secs),
        synthesizer_retries: config.orchestrator.synthesizer_retries,
    };
    let use_case = OrchestrateRequestUseCase::new(rules, state, action_space, scenario, gateway, budgets);

    let mut request = SubagentRequest::new(cli.message);
    request.investigator_id = cli.investigator;
    request.scenario_name = cli.scenario;
    if let Some(deck_spec) = cli.deck {
        request.deck_cards = Some(parse_deck_cards(&deck_spec)?);
    }
    request.mulligan_strategy = MulliganStrategy::default();

    let progress: &dyn ProgressNotifier = &NullProgressNotifier;
    let output = use_case.execute(request, progress, CancellationToken::new()).await?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
