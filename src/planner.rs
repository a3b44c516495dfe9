//! Two-level greedy nearest-neighbor tour construction.
//!
//! A tour visits every continent once, one representative city per continent,
//! and closes back at the source city. Continents are ordered first
//! ([`continent_sequence`]), then cities are picked along that order
//! ([`city_path`]); [`plan_tour`] ties the two together.

use std::fmt;

use crate::catalog::{Catalog, City, ContinentGrouping};
use crate::haversine;

/// Tour computation failure. Terminal: no partial results are returned.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanError {
    /// Non-finite coordinate fed to the distance calculation.
    InvalidCoordinate { lat: f64, lon: f64 },
    /// Source city id not present in the catalog.
    UnknownCity(String),
    /// No cities to route through.
    EmptyCatalog,
    /// A continent in the grouping has no cities to pick from.
    EmptyContinent(String),
    /// The assembled path references a city id missing from the catalog.
    InconsistentState(String),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::InvalidCoordinate { lat, lon } => {
                write!(f, "invalid coordinate ({lat}, {lon})")
            }
            PlanError::UnknownCity(id) => write!(f, "unknown city {id:?}"),
            PlanError::EmptyCatalog => write!(f, "city catalog is empty"),
            PlanError::EmptyContinent(id) => write!(f, "continent {id:?} has no cities"),
            PlanError::InconsistentState(id) => {
                write!(f, "city {id:?} is in the path but not the catalog")
            }
        }
    }
}

impl std::error::Error for PlanError {}

/// One stop of the final tour, with display metadata attached.
#[derive(Debug, Clone, PartialEq)]
pub struct TourStop {
    pub id: String,
    pub name: String,
    pub continent_id: String,
}

/// A complete round trip from a source city.
#[derive(Debug, Clone, PartialEq)]
pub struct TourPlan {
    /// Total travelled distance, rounded up once to whole kilometers.
    pub total_distance_km: u64,
    /// Ordered stops; first and last are the source city.
    pub stops: Vec<TourStop>,
}

/// Compute the full round trip from `source`.
///
/// The caller's `grouping` is never mutated; the continent sequencer works on
/// its own copy, so concurrent plans over a shared catalog do not interfere.
pub fn plan_tour(
    source: &str,
    catalog: &Catalog,
    grouping: &ContinentGrouping,
) -> Result<TourPlan, PlanError> {
    let sequence = continent_sequence(source, catalog, grouping)?;
    tracing::debug!(?sequence, "continent order fixed");

    // The source continent is already represented by the source city itself.
    let (total_distance_km, mut path) = city_path(source, catalog, grouping, &sequence[1..])?;

    // Close the loop back to where we started.
    path.push(source.to_string());

    let stops = path
        .into_iter()
        .map(|id| match catalog.get(&id) {
            Some(city) => Ok(TourStop {
                id,
                name: city.name.clone(),
                continent_id: city.continent_id.clone(),
            }),
            None => Err(PlanError::InconsistentState(id)),
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!(
        source,
        stops = stops.len(),
        total_distance_km,
        "tour planned"
    );

    Ok(TourPlan {
        total_distance_km,
        stops,
    })
}

/// Order all continents greedily, starting from the source city's continent.
///
/// Each round scans every city of every remaining continent and picks the
/// continent owning the globally nearest city (first encountered wins ties).
/// The reference point for the *next* round is that continent's first-listed
/// city, not the nearest city that won the round. The two notions are kept
/// deliberately distinct for behavior compatibility with the original planner.
pub fn continent_sequence(
    source: &str,
    catalog: &Catalog,
    grouping: &ContinentGrouping,
) -> Result<Vec<String>, PlanError> {
    if catalog.is_empty() {
        return Err(PlanError::EmptyCatalog);
    }
    let source_city = catalog
        .get(source)
        .ok_or_else(|| PlanError::UnknownCity(source.to_string()))?;

    let mut remaining = grouping.clone();
    remaining.remove(&source_city.continent_id);

    let mut sequence = vec![source_city.continent_id.clone()];
    let mut reference: &City = source_city;

    while !remaining.is_empty() {
        let mut shortest = f64::INFINITY;
        let mut chosen: Option<(String, String)> = None;

        for (continent_id, city_ids) in remaining.iter() {
            for city_id in city_ids {
                let candidate = city(catalog, city_id)?;
                let distance =
                    haversine::distance_km(reference.location.as_pair(), candidate.location.as_pair())?;
                if distance < shortest {
                    shortest = distance;
                    // The continent is chosen by its nearest city, but its
                    // first-listed city becomes the next reference point.
                    chosen = Some((continent_id.to_string(), city_ids[0].clone()));
                }
            }
        }

        let (continent_id, first_listed) = chosen.ok_or_else(|| {
            let empty = remaining.iter().next().map(|(id, _)| id).unwrap_or("");
            PlanError::EmptyContinent(empty.to_string())
        })?;

        reference = city(catalog, &first_listed)?;
        remaining.remove(&continent_id);
        sequence.push(continent_id);
    }

    Ok(sequence)
}

/// Walk the given continents in order, visiting the nearest city of each.
///
/// Returns the total distance rounded up once (ceiling of the sum, not a sum
/// of per-leg ceilings) and the open path starting at `source`. The closing
/// leg back to the source is the assembler's business, not this function's.
pub fn city_path(
    source: &str,
    catalog: &Catalog,
    grouping: &ContinentGrouping,
    continents: &[String],
) -> Result<(u64, Vec<String>), PlanError> {
    let mut current = catalog
        .get(source)
        .ok_or_else(|| PlanError::UnknownCity(source.to_string()))?;

    let mut path = vec![source.to_string()];
    let mut total = 0.0_f64;

    for continent_id in continents {
        let city_ids = grouping
            .cities(continent_id)
            .filter(|ids| !ids.is_empty())
            .ok_or_else(|| PlanError::EmptyContinent(continent_id.clone()))?;

        let mut shortest = f64::INFINITY;
        let mut nearest: Option<(&String, &City)> = None;

        for city_id in city_ids {
            let candidate = city(catalog, city_id)?;
            let distance =
                haversine::distance_km(current.location.as_pair(), candidate.location.as_pair())?;
            if distance < shortest {
                shortest = distance;
                nearest = Some((city_id, candidate));
            }
        }

        // Non-empty list and finite coordinates guarantee a winner.
        let (city_id, candidate) =
            nearest.ok_or_else(|| PlanError::EmptyContinent(continent_id.clone()))?;

        path.push(city_id.clone());
        total += shortest;
        current = candidate;
    }

    Ok((total.ceil() as u64, path))
}

fn city<'a>(catalog: &'a Catalog, id: &str) -> Result<&'a City, PlanError> {
    catalog
        .get(id)
        .ok_or_else(|| PlanError::InconsistentState(id.to_string()))
}
