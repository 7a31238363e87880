//! PokeAPI client

use std::sync::OnceLock;

use futures_util::future::try_join_all;
use serde::Deserialize;
use thiserror::Error;

use crate::state::{EvolutionChain, Pokemon, PokemonStat};

const API_BASE: &str = "https://pokeapi.co/api/v2";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("no entry for '{0}'")]
    NotFound(String),
    #[error("unexpected response shape: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ApiResource {
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    height: u16,
    weight: u16,
    base_experience: Option<u16>,
    types: Vec<PokemonTypeSlot>,
    stats: Vec<PokemonStatSlot>,
    abilities: Vec<PokemonAbilitySlot>,
    species: ApiResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u16,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct SpeciesResponse {
    evolution_chain: Option<ApiResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct EvolutionChainResponse {
    chain: ChainLink,
}

#[derive(Clone, Debug, Deserialize)]
struct ChainLink {
    species: NamedResource,
    evolves_to: Vec<ChainLink>,
}

/// Fetch a single entity by numeric ID or name.
pub async fn fetch_pokemon(id_or_name: &str) -> Result<Pokemon, ApiError> {
    let url = format!("{API_BASE}/pokemon/{id_or_name}");
    let response: PokemonResponse = fetch_json(&url, id_or_name).await?;
    Ok(pokemon_from_response(response))
}

/// Fetch the inclusive ID range `[first, last]`, one request per ID,
/// concurrently. Fails as a whole on the first error; the batch is
/// re-sorted ascending by ID before it is returned.
pub async fn fetch_page(first: u32, last: u32) -> Result<Vec<Pokemon>, ApiError> {
    let mut batch = try_join_all((first..=last).map(fetch_pokemon_by_id)).await?;
    batch.sort_by_key(|pokemon| pokemon.id);
    Ok(batch)
}

async fn fetch_pokemon_by_id(id: u32) -> Result<Pokemon, ApiError> {
    fetch_pokemon(&id.to_string()).await
}

/// Resolve the evolution chain behind an entity's species reference.
/// Two sequential fetches: the chain URL is embedded in the species record.
pub async fn fetch_evolution_chain(species_url: &str) -> Result<EvolutionChain, ApiError> {
    let species: SpeciesResponse = fetch_json(species_url, species_url).await?;
    let chain_url = species
        .evolution_chain
        .ok_or_else(|| ApiError::NotFound(species_url.to_string()))?
        .url;
    let response: EvolutionChainResponse = fetch_json(&chain_url, &chain_url).await?;
    let mut stages = Vec::new();
    collect_stages(&response.chain, &mut stages);
    Ok(EvolutionChain { stages })
}

fn collect_stages(link: &ChainLink, stages: &mut Vec<String>) {
    if !stages.contains(&link.species.name) {
        stages.push(link.species.name.clone());
    }
    for next in &link.evolves_to {
        collect_stages(next, stages);
    }
}

fn pokemon_from_response(response: PokemonResponse) -> Pokemon {
    Pokemon {
        id: response.id,
        name: response.name,
        types: response
            .types
            .into_iter()
            .map(|slot| slot.type_info.name)
            .collect(),
        stats: response
            .stats
            .into_iter()
            .map(|slot| PokemonStat {
                name: slot.stat.name,
                value: slot.base_stat,
            })
            .collect(),
        abilities: response
            .abilities
            .into_iter()
            .map(|slot| slot.ability.name)
            .collect(),
        height: response.height,
        weight: response.weight,
        base_experience: response.base_experience,
        species_url: response.species.url,
    }
}

async fn fetch_json<T: serde::de::DeserializeOwned>(
    url: &str,
    identifier: &str,
) -> Result<T, ApiError> {
    let response = http_client().get(url).send().await?;
    if response.status() == reqwest::StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(identifier.to_string()));
    }
    let response = response.error_for_status()?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}
