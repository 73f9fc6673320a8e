// Player reference data loading.
//
// Reads a CSV with `id,name,position,club,rating` and the optional attribute
// columns `pace,dribbling,passing,physical,defending`. An empty attribute
// cell means the attribute is unknown.

use std::io::Read;
use std::path::Path;

use lineup_core::catalog::CatalogError;
use lineup_core::{Player, PlayerCatalog};
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::DataPaths;

/// Highest rating or attribute value accepted from the CSV.
pub const MAX_RATING: u8 = 99;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PlayerImportError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("invalid player data: {0}")]
    Catalog(#[from] CatalogError),

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV row (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawPlayer {
    id: u32,
    name: String,
    position: String,
    #[serde(default)]
    club: String,
    rating: u8,
    #[serde(default)]
    pace: Option<u8>,
    #[serde(default)]
    dribbling: Option<u8>,
    #[serde(default)]
    passing: Option<u8>,
    #[serde(default)]
    physical: Option<u8>,
    #[serde(default)]
    defending: Option<u8>,
}

impl RawPlayer {
    fn out_of_range(&self) -> bool {
        std::iter::once(Some(self.rating))
            .chain([
                self.pace,
                self.dribbling,
                self.passing,
                self.physical,
                self.defending,
            ])
            .flatten()
            .any(|v| v > MAX_RATING)
    }

    fn into_player(self) -> Player {
        Player {
            pace: self.pace,
            dribbling: self.dribbling,
            passing: self.passing,
            physical: self.physical,
            defending: self.defending,
            ..Player::new(
                self.id,
                self.name.trim(),
                self.position.trim(),
                self.club.trim(),
                self.rating,
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Reader-based loader (private, enables testing without temp files)
// ---------------------------------------------------------------------------

fn load_players_from_reader<R: Read>(rdr: R) -> Result<Vec<Player>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let mut players = Vec::new();
    for result in reader.deserialize::<RawPlayer>() {
        match result {
            Ok(raw) => {
                if raw.name.trim().is_empty() {
                    warn!("skipping player {}: empty name", raw.id);
                    continue;
                }
                if raw.out_of_range() {
                    warn!(
                        "skipping player '{}': rating or attribute above {}",
                        raw.name.trim(),
                        MAX_RATING
                    );
                    continue;
                }
                if lineup_core::Position::from_code(raw.position.trim()).is_none() {
                    // Kept: unknown codes still count towards the score average.
                    warn!(
                        "player '{}' has unrecognized position '{}'",
                        raw.name.trim(),
                        raw.position.trim()
                    );
                }
                players.push(raw.into_player());
            }
            Err(e) => {
                warn!("skipping malformed player row: {}", e);
            }
        }
    }
    Ok(players)
}

// ---------------------------------------------------------------------------
// Public loaders
// ---------------------------------------------------------------------------

/// Load players from a CSV file.
pub fn load_players(path: &Path) -> Result<Vec<Player>, PlayerImportError> {
    let file = std::fs::File::open(path).map_err(|e| PlayerImportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_players_from_reader(file).map_err(|e| PlayerImportError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load the player catalog named by the config's data paths.
pub fn load_catalog(paths: &DataPaths) -> Result<PlayerCatalog, PlayerImportError> {
    let players = load_players(Path::new(&paths.players))?;
    if players.is_empty() {
        return Err(PlayerImportError::Validation(
            "player CSV produced zero valid rows".into(),
        ));
    }
    let catalog = PlayerCatalog::new(players)?;
    info!("loaded {} players from {}", catalog.len(), paths.players);
    Ok(catalog)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use lineup_core::Position;

    const HEADER: &str = "id,name,position,club,rating,pace,dribbling,passing,physical,defending";

    fn parse(body: &str) -> Vec<Player> {
        let data = format!("{HEADER}\n{body}");
        load_players_from_reader(data.as_bytes()).unwrap()
    }

    #[test]
    fn full_row_parses_every_column() {
        let players = parse("19,Kylian Mbappé,LW,PSG,91,97,92,80,77,36");
        assert_eq!(players.len(), 1);
        let p = &players[0];
        assert_eq!(p.id, 19);
        assert_eq!(p.name, "Kylian Mbappé");
        assert_eq!(p.position(), Some(Position::LeftWing));
        assert_eq!(p.club, "PSG");
        assert_eq!(p.rating, 91);
        assert_eq!(p.pace, Some(97));
        assert_eq!(p.defending, Some(36));
    }

    #[test]
    fn empty_attribute_cells_are_absent() {
        let players = parse("1,Hugo Lloris,GK,Tottenham Hotspur,88,,,,,");
        let p = &players[0];
        assert_eq!(p.pace, None);
        assert_eq!(p.physical, None);
        assert!((p.pace_value() - 88.0 * 0.8).abs() < 1e-9);
    }

    #[test]
    fn missing_attribute_columns_are_absent() {
        let data = "id,name,position,club,rating\n5,Lucas Digne,LB,Aston Villa,82";
        let players = load_players_from_reader(data.as_bytes()).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].dribbling, None);
    }

    #[test]
    fn explicit_zero_attribute_is_kept() {
        let players = parse("7,Statue,CB,Club,80,0,,,,");
        assert_eq!(players[0].pace, Some(0));
        assert_eq!(players[0].pace_value(), 0.0);
    }

    #[test]
    fn whitespace_is_trimmed() {
        let players = parse(" 3 , Lucas Hernandez , LB , Bayern Munich , 84 ,,,,,");
        assert_eq!(players[0].name, "Lucas Hernandez");
        assert_eq!(players[0].position(), Some(Position::LeftBack));
        assert_eq!(players[0].club, "Bayern Munich");
    }

    #[test]
    fn lower_case_code_is_kept_but_unrecognized() {
        let players = parse("3,Lucas Hernandez,lb,Bayern Munich,84,,,,,");
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].position_code, "lb");
        assert_eq!(players[0].position(), None);
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let players = parse(
            "x,No Id,ST,Club,80,,,,,\n\
             2,Bad Rating,ST,Club,high,,,,,\n\
             3,Too High,ST,Club,120,,,,,\n\
             4,Bad Attr,ST,Club,80,101,,,,\n\
             5,,ST,Club,80,,,,,\n\
             6,Good,ST,Club,80,,,,,",
        );
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "Good");
    }

    #[test]
    fn unknown_position_is_kept() {
        let players = parse("9,Sweeper,SW,Club,75,,,,,");
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].position(), None);
        assert_eq!(players[0].position_code, "SW");
    }

    #[test]
    fn load_players_missing_file_is_io_error() {
        let err = load_players(Path::new("/nonexistent/players.csv")).unwrap_err();
        assert!(matches!(err, PlayerImportError::Io { .. }));
    }

    #[test]
    fn load_catalog_rejects_zero_rows() {
        let tmp = std::env::temp_dir().join("lineup_players_zero_rows.csv");
        std::fs::write(&tmp, format!("{HEADER}\nx,Bad,ST,Club,80,,,,,\n")).unwrap();
        let paths = DataPaths {
            players: tmp.display().to_string(),
        };
        let err = load_catalog(&paths).unwrap_err();
        assert!(matches!(err, PlayerImportError::Validation(_)));
        let _ = std::fs::remove_file(&tmp);
    }

    #[test]
    fn load_catalog_rejects_duplicate_ids() {
        let tmp = std::env::temp_dir().join("lineup_players_duplicate_ids.csv");
        std::fs::write(
            &tmp,
            format!("{HEADER}\n1,First,ST,Club,80,,,,,\n1,Second,GK,Club,70,,,,,\n"),
        )
        .unwrap();
        let paths = DataPaths {
            players: tmp.display().to_string(),
        };
        let err = load_catalog(&paths).unwrap_err();
        assert!(matches!(err, PlayerImportError::Catalog(_)));
        let _ = std::fs::remove_file(&tmp);
    }
}
