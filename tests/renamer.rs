//! End-to-end pipeline tests: parse -> enrich -> rename over a real
//! temporary directory tree, with an in-memory metadata provider.

use std::collections::{BTreeSet, HashMap};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tvtidy::{MetadataError, MetadataProvider, RenameError, RenamerError, ShowRenamer};

/// In-memory provider: per season, episode titles keyed 1..N.
struct FakeProvider {
    seasons: HashMap<u32, Vec<String>>,
}

impl FakeProvider {
    fn new(seasons: &[(u32, &[&str])]) -> Self {
        Self {
            seasons: seasons
                .iter()
                .map(|(number, titles)| {
                    (*number, titles.iter().map(|t| t.to_string()).collect())
                })
                .collect(),
        }
    }

    /// A provider that knows no show at all.
    fn empty() -> Self {
        Self {
            seasons: HashMap::new(),
        }
    }
}

impl MetadataProvider for FakeProvider {
    fn episode_titles(
        &self,
        show_name: &str,
        show_year: u16,
        season: u32,
    ) -> Result<HashMap<u32, String>, MetadataError> {
        self.seasons
            .get(&season)
            .map(|titles| {
                titles
                    .iter()
                    .enumerate()
                    .map(|(index, title)| (index as u32 + 1, title.clone()))
                    .collect()
            })
            .ok_or_else(|| MetadataError::NoMatchFound {
                show_name: show_name.to_string(),
                show_year,
            })
    }
}

fn fake_show_root(root: &TempDir, name: &str) -> PathBuf {
    let show_root = root.path().join(name);
    fs::create_dir_all(&show_root).unwrap();
    show_root
}

fn fake_season(show_root: &Path, season_num: u32, episode_count: u32) -> PathBuf {
    let season = show_root.join(format!("Season {season_num:02}"));
    fs::create_dir_all(&season).unwrap();
    for episode_num in 1..=episode_count {
        File::create(season.join(format!("Ep {episode_num:02}.mkv"))).unwrap();
    }
    season
}

/// All regular files under the root, for whole-tree assertions.
fn files_under(root: &Path) -> BTreeSet<PathBuf> {
    let mut files = BTreeSet::new();
    collect_files(root, &mut files);
    files
}

fn collect_files(dir: &Path, files: &mut BTreeSet<PathBuf>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect_files(&path, files);
        } else {
            files.insert(path);
        }
    }
}

const SEASON_1_TITLES: &[&str] = &[
    "Pilot",
    "Cat's in the Bag...",
    "...And the Bag's in the River",
    "Cancer Man",
    "Gray Matter",
    "Crazy Handful of Nothin'",
    "A No-Rough-Stuff-Type Deal",
];

#[test]
fn every_episode() {
    let root = TempDir::new().unwrap();
    let show_root = fake_show_root(&root, "Breaking Bad (2008)");
    let season1 = fake_season(&show_root, 1, 7);
    let season2 = fake_season(&show_root, 2, 3);

    let renamer = ShowRenamer::new(FakeProvider::new(&[
        (1, SEASON_1_TITLES),
        (2, &["Seven Thirty-Seven", "Grilled", "Bit by a Dead Bee"]),
    ]));
    let count = renamer.run(&show_root, false).unwrap();

    assert_eq!(count, 10);
    assert_eq!(
        files_under(&show_root),
        BTreeSet::from([
            season1.join("Breaking Bad S01E01 Pilot.mkv"),
            season1.join("Breaking Bad S01E02 Cat's in the Bag....mkv"),
            season1.join("Breaking Bad S01E03 ...And the Bag's in the River.mkv"),
            season1.join("Breaking Bad S01E04 Cancer Man.mkv"),
            season1.join("Breaking Bad S01E05 Gray Matter.mkv"),
            season1.join("Breaking Bad S01E06 Crazy Handful of Nothin'.mkv"),
            season1.join("Breaking Bad S01E07 A No-Rough-Stuff-Type Deal.mkv"),
            season2.join("Breaking Bad S02E01 Seven Thirty-Seven.mkv"),
            season2.join("Breaking Bad S02E02 Grilled.mkv"),
            season2.join("Breaking Bad S02E03 Bit by a Dead Bee.mkv"),
        ])
    );
}

#[test]
fn skipped_seasons() {
    let root = TempDir::new().unwrap();
    let show_root = fake_show_root(&root, "Breaking Bad (2008)");
    let season1 = fake_season(&show_root, 1, 2);
    let season5 = fake_season(&show_root, 5, 2);

    let renamer = ShowRenamer::new(FakeProvider::new(&[
        (1, &["Pilot", "Cat's in the Bag..."]),
        (5, &["Live Free or Die", "Madrigal"]),
    ]));
    let count = renamer.run(&show_root, false).unwrap();

    assert_eq!(count, 4);
    assert_eq!(
        files_under(&show_root),
        BTreeSet::from([
            season1.join("Breaking Bad S01E01 Pilot.mkv"),
            season1.join("Breaking Bad S01E02 Cat's in the Bag....mkv"),
            season5.join("Breaking Bad S05E01 Live Free or Die.mkv"),
            season5.join("Breaking Bad S05E02 Madrigal.mkv"),
        ])
    );
}

#[test]
fn missing_episodes() {
    // Fewer local files than remote titles: extra titles simply unused.
    let root = TempDir::new().unwrap();
    let show_root = fake_show_root(&root, "Breaking Bad (2008)");
    let season1 = fake_season(&show_root, 1, 5);

    let renamer = ShowRenamer::new(FakeProvider::new(&[(1, SEASON_1_TITLES)]));
    let count = renamer.run(&show_root, false).unwrap();

    assert_eq!(count, 5);
    assert_eq!(
        files_under(&show_root),
        BTreeSet::from([
            season1.join("Breaking Bad S01E01 Pilot.mkv"),
            season1.join("Breaking Bad S01E02 Cat's in the Bag....mkv"),
            season1.join("Breaking Bad S01E03 ...And the Bag's in the River.mkv"),
            season1.join("Breaking Bad S01E04 Cancer Man.mkv"),
            season1.join("Breaking Bad S01E05 Gray Matter.mkv"),
        ])
    );
}

#[test]
fn extra_episodes() {
    // More local files (9) than remote titles (7): the excess episodes are
    // still renamed, without a title segment.
    let root = TempDir::new().unwrap();
    let show_root = fake_show_root(&root, "Breaking Bad (2008)");
    let season1 = fake_season(&show_root, 1, 9);

    let renamer = ShowRenamer::new(FakeProvider::new(&[(1, SEASON_1_TITLES)]));
    let count = renamer.run(&show_root, false).unwrap();

    assert_eq!(count, 9);
    assert_eq!(
        files_under(&show_root),
        BTreeSet::from([
            season1.join("Breaking Bad S01E01 Pilot.mkv"),
            season1.join("Breaking Bad S01E02 Cat's in the Bag....mkv"),
            season1.join("Breaking Bad S01E03 ...And the Bag's in the River.mkv"),
            season1.join("Breaking Bad S01E04 Cancer Man.mkv"),
            season1.join("Breaking Bad S01E05 Gray Matter.mkv"),
            season1.join("Breaking Bad S01E06 Crazy Handful of Nothin'.mkv"),
            season1.join("Breaking Bad S01E07 A No-Rough-Stuff-Type Deal.mkv"),
            season1.join("Breaking Bad S01E08.mkv"),
            season1.join("Breaking Bad S01E09.mkv"),
        ])
    );
}

#[test]
fn season_00_for_bonus_or_special_episodes() {
    let root = TempDir::new().unwrap();
    let show_root = fake_show_root(&root, "Sherlock (2010)");
    let season0 = fake_season(&show_root, 0, 2);
    let season1 = fake_season(&show_root, 1, 3);

    let renamer = ShowRenamer::new(FakeProvider::new(&[
        (0, &["Unaired Pilot", "Unlocking Sherlock"]),
        (1, &["A Study in Pink", "The Blind Banker", "The Great Game"]),
    ]));
    let count = renamer.run(&show_root, false).unwrap();

    assert_eq!(count, 5);
    assert_eq!(
        files_under(&show_root),
        BTreeSet::from([
            season0.join("Sherlock S00E01 Unaired Pilot.mkv"),
            season0.join("Sherlock S00E02 Unlocking Sherlock.mkv"),
            season1.join("Sherlock S01E01 A Study in Pink.mkv"),
            season1.join("Sherlock S01E02 The Blind Banker.mkv"),
            season1.join("Sherlock S01E03 The Great Game.mkv"),
        ])
    );
}

#[test]
fn titles_with_illegal_path_chars_are_sanitized() {
    let root = TempDir::new().unwrap();
    let show_root = fake_show_root(&root, "Doctor Who (2005)");
    let season1 = fake_season(&show_root, 1, 1);

    let renamer = ShowRenamer::new(FakeProvider::new(&[(1, &[r#"Rose: Who? "First"/Last"#])]));
    renamer.run(&show_root, false).unwrap();

    assert_eq!(
        files_under(&show_root),
        BTreeSet::from([season1.join("Doctor Who S01E01 Rose Who FirstLast.mkv")])
    );
}

#[test]
fn dry_run_reports_the_plan_without_moving_anything() {
    let root = TempDir::new().unwrap();
    let show_root = fake_show_root(&root, "Breaking Bad (2008)");
    let season1 = fake_season(&show_root, 1, 2);
    let before = files_under(&show_root);

    let renamer = ShowRenamer::new(FakeProvider::new(&[(1, &["Pilot", "Cat's in the Bag..."])]));
    let count = renamer.run(&show_root, true).unwrap();

    assert_eq!(count, 2);
    assert_eq!(files_under(&show_root), before);
    assert!(season1.join("Ep 01.mkv").is_file());
}

#[test]
fn second_run_renames_nothing() {
    let root = TempDir::new().unwrap();
    let show_root = fake_show_root(&root, "Breaking Bad (2008)");
    fake_season(&show_root, 1, 7);

    let renamer = ShowRenamer::new(FakeProvider::new(&[(1, SEASON_1_TITLES)]));

    assert_eq!(renamer.run(&show_root, false).unwrap(), 7);
    let after_first = files_under(&show_root);

    // All computed target paths now equal the current paths.
    assert_eq!(renamer.run(&show_root, false).unwrap(), 0);
    assert_eq!(files_under(&show_root), after_first);
}

#[test]
fn unresolvable_show_aborts_before_any_file_is_touched() {
    let root = TempDir::new().unwrap();
    let show_root = fake_show_root(&root, "No Such Show (1999)");
    fake_season(&show_root, 1, 2);
    let before = files_under(&show_root);

    let renamer = ShowRenamer::new(FakeProvider::empty());
    let result = renamer.run(&show_root, false);

    assert!(matches!(
        result,
        Err(RenamerError::Metadata(MetadataError::NoMatchFound { .. }))
    ));
    assert_eq!(files_under(&show_root), before);
}

#[test]
fn colliding_target_aborts_instead_of_overwriting_a_sibling() {
    let root = TempDir::new().unwrap();
    let show_root = fake_show_root(&root, "Breaking Bad (2008)");
    let season1 = show_root.join("Season 01");
    fs::create_dir_all(&season1).unwrap();
    // "Aaa.mkv" sorts first, so its computed target is the second file's
    // current name.
    fs::write(season1.join("Aaa.mkv"), "episode one").unwrap();
    fs::write(season1.join("Breaking Bad S01E01 Pilot.mkv"), "episode two").unwrap();

    let renamer = ShowRenamer::new(FakeProvider::new(&[(1, &["Pilot", "Grilled"])]));
    let result = renamer.run(&show_root, false);

    assert!(matches!(
        result,
        Err(RenamerError::Rename(RenameError::TargetExists { .. }))
    ));
    // Both files survive untouched.
    assert_eq!(
        fs::read_to_string(season1.join("Aaa.mkv")).unwrap(),
        "episode one"
    );
    assert_eq!(
        fs::read_to_string(season1.join("Breaking Bad S01E01 Pilot.mkv")).unwrap(),
        "episode two"
    );
}

#[test]
fn malformed_show_directory_aborts_the_run() {
    let root = TempDir::new().unwrap();
    // No year suffix.
    let show_root = fake_show_root(&root, "Breaking Bad");
    fake_season(&show_root, 1, 2);

    let renamer = ShowRenamer::new(FakeProvider::new(&[(1, &["Pilot", "Grilled"])]));
    let result = renamer.run(&show_root, false);

    assert!(matches!(result, Err(RenamerError::Parse(_))));
}
