//! Loads the JSON asset pack into engine and presentation types.
//!
//! Four files make up a pack: `blocks.json` describes tiles and entity
//! glyphs, `colors.json` lists palette pairs, `mazes.json` holds the
//! playable boards, and `menu.json` the start and end screens. Loading
//! resolves every name eagerly; board geometry is checked later, when a
//! maze assembles.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use maze_chase_core::{Block, BlockCatalog, BlockId, BlockKind, CatalogError, ChaserKind, GridPos};
use maze_chase_rendering::{Color, ColorPair, GlyphCell, MenuView, Palette, TextLine};
use maze_chase_system_bootstrap::MazeDescriptor;
use maze_chase_world::ChaserSpec;
use serde::Deserialize;
use thiserror::Error;

/// Everything the interface needs, loaded once at startup.
pub(crate) struct Assets {
    /// Tile varieties shared by every maze.
    pub catalog: BlockCatalog,
    /// Glyphs for the entities drawn over the tiles.
    pub sprites: SpriteGlyphs,
    /// Playable mazes in menu order.
    pub mazes: Vec<MazeAsset>,
    /// Menu screens keyed by the moment they appear.
    pub menus: Menus,
    /// Color pairs referenced by tiles, sprites, and menu text.
    pub palette: Palette,
}

/// Glyphs for the pieces that move over the board.
pub(crate) struct SpriteGlyphs {
    /// The player pawn.
    pub player: GlyphCell,
    /// Every chaser, patrol and pursuit alike.
    pub chaser: GlyphCell,
    /// Overlay on the cell a patrol is currently heading for.
    pub marker: GlyphCell,
}

/// One playable maze with its display name.
pub(crate) struct MazeAsset {
    /// Name shown in the board status strip.
    pub name: String,
    /// Raw maze exactly as authored.
    pub descriptor: MazeDescriptor,
}

/// Menu templates for the three session screens.
#[derive(Debug, Deserialize)]
pub(crate) struct Menus {
    /// Maze selection screen.
    pub start: MenuTemplate,
    /// Screen shown after reaching the exit.
    pub win: MenuTemplate,
    /// Screen shown after a chaser catches the player.
    pub lose: MenuTemplate,
}

/// Authored menu screen with placeholder lines.
#[derive(Debug, Deserialize)]
pub(crate) struct MenuTemplate {
    height: u32,
    width: u32,
    texts: Vec<TextEntry>,
}

impl MenuTemplate {
    /// Renders the template, substituting `{}` in variable lines with the
    /// provided fillings, in authoring order.
    pub(crate) fn render(&self, fillings: &[String]) -> MenuView {
        let mut fillings = fillings.iter();
        let lines = self
            .texts
            .iter()
            .map(|text| {
                let content = if text.variable {
                    let filling = fillings.next().map_or("", String::as_str);
                    text.content.replacen("{}", filling, 1)
                } else {
                    text.content.clone()
                };
                TextLine::new(content, text.line, text.align, text.indent, text.color)
            })
            .collect();
        MenuView::new(self.height, self.width, lines)
    }
}

#[derive(Debug, Deserialize)]
struct TextEntry {
    content: String,
    line: u32,
    #[serde(default)]
    align: bool,
    #[serde(default)]
    indent: i32,
    #[serde(default)]
    variable: bool,
    #[serde(default)]
    color: u8,
}

#[derive(Debug, Deserialize)]
struct BlocksFile {
    default: BlockDefaults,
    blocks: Vec<BlockEntry>,
}

#[derive(Debug, Deserialize)]
struct BlockDefaults {
    #[serde(rename = "char")]
    glyph: char,
    color: u8,
    is_solid: bool,
}

#[derive(Debug, Deserialize)]
struct BlockEntry {
    name: String,
    #[serde(rename = "char")]
    glyph: Option<char>,
    color: Option<u8>,
    is_solid: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct MazeEntry {
    name: String,
    height: u32,
    width: u32,
    start: [u32; 2],
    end: [u32; 2],
    block_names: Vec<String>,
    #[serde(default)]
    routes: Vec<RouteEntry>,
}

#[derive(Debug, Deserialize)]
struct RouteEntry {
    name: String,
    cells: Vec<[u32; 2]>,
}

/// Errors raised while loading the asset pack.
#[derive(Debug, Error)]
pub(crate) enum AssetError {
    /// An asset file could not be read from disk.
    #[error("could not read {path}")]
    Read {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: io::Error,
    },
    /// An asset file held malformed JSON.
    #[error("could not parse {path}")]
    Parse {
        /// Path of the malformed file.
        path: PathBuf,
        /// Underlying parser error.
        #[source]
        source: serde_json::Error,
    },
    /// A palette pair names a color outside the ANSI set.
    #[error("color pair {index} names unknown color '{name}'")]
    UnknownColor {
        /// Zero-based pair position in the file.
        index: usize,
        /// Unresolved color name.
        name: String,
    },
    /// A block name matches neither a tile role nor an entity glyph.
    #[error("block '{name}' plays no known role")]
    UnknownRole {
        /// Offending block name.
        name: String,
    },
    /// The same block name appears twice.
    #[error("block '{name}' is defined twice")]
    DuplicateBlock {
        /// Repeated block name.
        name: String,
    },
    /// A required entity glyph is missing from the block set.
    #[error("the block set defines no '{name}' block")]
    MissingBlock {
        /// Name of the absent block.
        name: &'static str,
    },
    /// The tile set cannot back a catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// A maze cell names a tile the block set does not define.
    #[error("maze '{maze}' references undefined block '{name}'")]
    UnknownMazeBlock {
        /// Name of the offending maze.
        maze: String,
        /// Unresolved tile name.
        name: String,
    },
}

/// Reads the four asset files under `directory`.
pub(crate) fn load(directory: &Path) -> Result<Assets, AssetError> {
    let palette = resolve_palette(read_json(&directory.join("colors.json"))?)?;
    let (catalog, tile_ids, sprites) = resolve_blocks(read_json(&directory.join("blocks.json"))?)?;
    let mazes = resolve_mazes(read_json(&directory.join("mazes.json"))?, &tile_ids)?;
    let menus: Menus = read_json(&directory.join("menu.json"))?;
    Ok(Assets {
        catalog,
        sprites,
        mazes,
        menus,
        palette,
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, AssetError> {
    let raw = fs::read_to_string(path).map_err(|source| AssetError::Read {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| AssetError::Parse {
        path: path.to_owned(),
        source,
    })
}

fn resolve_palette(pairs: Vec<[String; 2]>) -> Result<Palette, AssetError> {
    let mut resolved = Vec::with_capacity(pairs.len());
    for (index, [foreground, background]) in pairs.into_iter().enumerate() {
        resolved.push(ColorPair::new(
            resolve_color(index, foreground)?,
            resolve_color(index, background)?,
        ));
    }
    Ok(Palette::new(resolved))
}

fn resolve_color(index: usize, name: String) -> Result<Color, AssetError> {
    Color::from_name(&name).ok_or(AssetError::UnknownColor { index, name })
}

type ResolvedBlocks = (BlockCatalog, HashMap<String, BlockId>, SpriteGlyphs);

fn resolve_blocks(file: BlocksFile) -> Result<ResolvedBlocks, AssetError> {
    let defaults = file.default;
    let mut tiles = Vec::new();
    let mut tile_ids = HashMap::new();
    let mut player = None;
    let mut chaser = None;
    let mut marker = None;

    for entry in file.blocks {
        let glyph = entry.glyph.unwrap_or(defaults.glyph);
        let color = entry.color.unwrap_or(defaults.color);
        let solid = entry.is_solid.unwrap_or(defaults.is_solid);
        let cell = GlyphCell::new(glyph, color);

        let sprite_slot = match entry.name.as_str() {
            "player" => Some(&mut player),
            "chaser" => Some(&mut chaser),
            "marker" => Some(&mut marker),
            _ => None,
        };
        if let Some(slot) = sprite_slot {
            claim_glyph(slot, cell, entry.name)?;
            continue;
        }

        let kind = tile_role(&entry.name).ok_or_else(|| AssetError::UnknownRole {
            name: entry.name.clone(),
        })?;
        if tile_ids.contains_key(&entry.name) {
            return Err(AssetError::DuplicateBlock { name: entry.name });
        }
        let id = BlockId::new(tiles.len() as u16);
        let _ = tile_ids.insert(entry.name, id);
        tiles.push(Block::new(kind, glyph, color, solid));
    }

    let catalog = BlockCatalog::new(tiles)?;
    let sprites = SpriteGlyphs {
        player: player.ok_or(AssetError::MissingBlock { name: "player" })?,
        chaser: chaser.ok_or(AssetError::MissingBlock { name: "chaser" })?,
        marker: marker.ok_or(AssetError::MissingBlock { name: "marker" })?,
    };
    Ok((catalog, tile_ids, sprites))
}

fn claim_glyph(
    slot: &mut Option<GlyphCell>,
    glyph: GlyphCell,
    name: String,
) -> Result<(), AssetError> {
    if slot.replace(glyph).is_some() {
        return Err(AssetError::DuplicateBlock { name });
    }
    Ok(())
}

fn tile_role(name: &str) -> Option<BlockKind> {
    match name {
        "air" => Some(BlockKind::Air),
        "wall" => Some(BlockKind::Wall),
        "start" => Some(BlockKind::Start),
        "end" => Some(BlockKind::End),
        "box" => Some(BlockKind::Box),
        "bonus" => Some(BlockKind::Bonus),
        _ => None,
    }
}

fn resolve_mazes(
    entries: Vec<MazeEntry>,
    tile_ids: &HashMap<String, BlockId>,
) -> Result<Vec<MazeAsset>, AssetError> {
    entries
        .into_iter()
        .map(|entry| resolve_maze(entry, tile_ids))
        .collect()
}

fn resolve_maze(
    entry: MazeEntry,
    tile_ids: &HashMap<String, BlockId>,
) -> Result<MazeAsset, AssetError> {
    let mut cells = Vec::with_capacity(entry.block_names.len());
    for name in &entry.block_names {
        let id = tile_ids
            .get(name)
            .copied()
            .ok_or_else(|| AssetError::UnknownMazeBlock {
                maze: entry.name.clone(),
                name: name.clone(),
            })?;
        cells.push(id);
    }

    // Route names carrying "auto" spawn pursuit chasers; the rest patrol.
    let chasers = entry
        .routes
        .into_iter()
        .map(|route| {
            let kind = if route.name.contains("auto") {
                ChaserKind::Pursuit
            } else {
                ChaserKind::Patrol
            };
            let cells = route
                .cells
                .into_iter()
                .map(|[row, column]| GridPos::new(row, column))
                .collect();
            ChaserSpec::new(kind, cells)
        })
        .collect();

    Ok(MazeAsset {
        name: entry.name,
        descriptor: MazeDescriptor {
            height: entry.height,
            width: entry.width,
            start: GridPos::new(entry.start[0], entry.start[1]),
            end: GridPos::new(entry.end[0], entry.end[1]),
            cells,
            chasers,
        },
    })
}
