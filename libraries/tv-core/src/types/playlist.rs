/// Playlist domain types
use crate::types::{ColorKey, FilterKey, Video};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// ID of the playlist that collects videos played outside any playlist
pub const UNSORTED_PLAYLIST_ID: &str = "_unsorted_";

/// Colored sub-folder of a playlist
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Group display name
    #[serde(default)]
    pub name: String,

    /// IDs of the videos in this group
    #[serde(default, alias = "videos")]
    pub video_ids: BTreeSet<String>,
}

impl Group {
    fn named(color: ColorKey) -> Self {
        Self {
            name: color.display_name().to_string(),
            video_ids: BTreeSet::new(),
        }
    }
}

/// Playlist
///
/// `videos` order is authoritative for the `all` filter. Every color has
/// a group, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// YouTube playlist ID (or `_unsorted_`)
    pub id: String,

    /// Playlist name
    #[serde(default)]
    pub name: String,

    /// Videos in playlist order
    #[serde(default)]
    pub videos: Vec<Video>,

    /// Color groups
    #[serde(default = "default_groups", deserialize_with = "deserialize_groups")]
    pub groups: BTreeMap<ColorKey, Group>,
}

impl Playlist {
    /// Create an empty playlist with all color groups
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            videos: Vec::new(),
            groups: default_groups(),
        }
    }

    /// Create the distinguished unsorted playlist
    pub fn unsorted() -> Self {
        Self::new(UNSORTED_PLAYLIST_ID, "Unsorted")
    }

    pub fn is_unsorted(&self) -> bool {
        self.id == UNSORTED_PLAYLIST_ID
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    /// Video at `index`, if any
    pub fn video(&self, index: usize) -> Option<&Video> {
        self.videos.get(index)
    }

    /// Index of the first video with this ID
    pub fn index_of(&self, video_id: &str) -> Option<usize> {
        self.videos.iter().position(|v| v.id == video_id)
    }

    /// Indices (into `videos`) of every video eligible under `filter`
    pub fn eligible_indices(&self, filter: FilterKey) -> Vec<usize> {
        match filter {
            FilterKey::All => (0..self.videos.len()).collect(),
            FilterKey::Color(color) => match self.groups.get(&color) {
                Some(group) => self
                    .videos
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| group.video_ids.contains(&v.id))
                    .map(|(i, _)| i)
                    .collect(),
                None => Vec::new(),
            },
        }
    }

    /// Number of videos eligible under `filter`
    pub fn eligible_count(&self, filter: FilterKey) -> usize {
        match filter {
            FilterKey::All => self.videos.len(),
            FilterKey::Color(color) => self.groups.get(&color).map_or(0, |group| {
                self.videos
                    .iter()
                    .filter(|v| group.video_ids.contains(&v.id))
                    .count()
            }),
        }
    }

    /// Whether the video at `index` is eligible under `filter`
    pub fn is_eligible(&self, index: usize, filter: FilterKey) -> bool {
        let Some(video) = self.videos.get(index) else {
            return false;
        };
        match filter {
            FilterKey::All => true,
            FilterKey::Color(color) => self
                .groups
                .get(&color)
                .is_some_and(|group| group.video_ids.contains(&video.id)),
        }
    }

    /// `all` followed by every color with at least one eligible video
    pub fn available_filters(&self) -> Vec<FilterKey> {
        std::iter::once(FilterKey::All)
            .chain(
                ColorKey::ALL
                    .into_iter()
                    .map(FilterKey::Color)
                    .filter(|filter| self.eligible_count(*filter) > 0),
            )
            .collect()
    }

    /// Color group the video belongs to, if any
    pub fn color_of(&self, video_id: &str) -> Option<ColorKey> {
        ColorKey::ALL.into_iter().find(|color| {
            self.groups
                .get(color)
                .is_some_and(|group| group.video_ids.contains(video_id))
        })
    }

    /// Move a video into at most one color group
    ///
    /// Returns `true` if any group membership changed.
    pub fn set_video_color(&mut self, video_id: &str, color: Option<ColorKey>) -> bool {
        let mut changed = false;

        for (key, group) in &mut self.groups {
            if Some(*key) != color {
                changed |= group.video_ids.remove(video_id);
            }
        }

        if let Some(color) = color {
            let group = self
                .groups
                .entry(color)
                .or_insert_with(|| Group::named(color));
            changed |= group.video_ids.insert(video_id.to_string());
        }

        changed
    }

    /// Append a video unless one with the same ID exists
    ///
    /// Returns the video's index either way.
    pub fn push_video(&mut self, video: Video) -> usize {
        if let Some(index) = self.index_of(&video.id) {
            return index;
        }
        self.videos.push(video);
        self.videos.len() - 1
    }
}

fn default_groups() -> BTreeMap<ColorKey, Group> {
    ColorKey::ALL
        .into_iter()
        .map(|color| (color, Group::named(color)))
        .collect()
}

/// Keeps known colors, drops custom ones, fills in missing groups
fn deserialize_groups<'de, D>(deserializer: D) -> Result<BTreeMap<ColorKey, Group>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Group>> = Option::deserialize(deserializer)?;
    let mut groups = default_groups();

    for (key, group) in raw.unwrap_or_default() {
        if let Some(color) = ColorKey::from_str(&key) {
            groups.insert(color, group);
        }
    }

    Ok(groups)
}

/// Named set of playlists shown together
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistTab {
    /// Tab name
    pub name: String,

    /// Playlists on this tab
    #[serde(default)]
    pub playlist_ids: Vec<String>,
}

impl PlaylistTab {
    /// The implicit first tab, which shows every regular playlist
    pub fn all() -> Self {
        Self {
            name: "All".to_string(),
            playlist_ids: Vec::new(),
        }
    }
}

/// Ordered collection of playlists with unique IDs
///
/// The unsorted playlist always exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Playlist>", into = "Vec<Playlist>")]
pub struct PlaylistSet {
    playlists: Vec<Playlist>,
}

impl PlaylistSet {
    /// Build a set, keeping the first occurrence of each playlist ID
    pub fn new(playlists: Vec<Playlist>) -> Self {
        let mut seen = BTreeSet::new();
        let mut unique: Vec<Playlist> = playlists
            .into_iter()
            .filter(|p| seen.insert(p.id.clone()))
            .collect();

        if !unique.iter().any(Playlist::is_unsorted) {
            unique.push(Playlist::unsorted());
        }

        Self { playlists: unique }
    }

    pub fn get(&self, id: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Playlist> {
        self.playlists.iter_mut().find(|p| p.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.playlists.iter().position(|p| p.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Playlist> {
        self.playlists.iter()
    }

    pub fn as_slice(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn len(&self) -> usize {
        self.playlists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }

    /// The unsorted playlist
    pub fn unsorted_mut(&mut self) -> &mut Playlist {
        if let Some(index) = self.position(UNSORTED_PLAYLIST_ID) {
            &mut self.playlists[index]
        } else {
            self.playlists.push(Playlist::unsorted());
            let last = self.playlists.len() - 1;
            &mut self.playlists[last]
        }
    }

    /// First playlist that has at least one video
    pub fn first_non_empty(&self) -> Option<&Playlist> {
        self.playlists.iter().find(|p| !p.is_empty())
    }

    /// IDs of the playlists shown on a tab, in playlist order
    ///
    /// Tab 0 (and any unknown tab) shows every playlist except unsorted.
    pub fn tab_playlist_ids(&self, tabs: &[PlaylistTab], tab_index: usize) -> Vec<&str> {
        let members = tabs.get(tab_index).filter(|_| tab_index > 0);

        self.playlists
            .iter()
            .filter(|p| match members {
                Some(tab) => tab.playlist_ids.iter().any(|id| *id == p.id),
                None => !p.is_unsorted(),
            })
            .map(|p| p.id.as_str())
            .collect()
    }

    pub fn into_vec(self) -> Vec<Playlist> {
        self.playlists
    }
}

impl Default for PlaylistSet {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl From<Vec<Playlist>> for PlaylistSet {
    fn from(playlists: Vec<Playlist>) -> Self {
        Self::new(playlists)
    }
}

impl From<PlaylistSet> for Vec<Playlist> {
    fn from(set: PlaylistSet) -> Self {
        set.playlists
    }
}

impl<'a> IntoIterator for &'a PlaylistSet {
    type Item = &'a Playlist;
    type IntoIter = std::slice::Iter<'a, Playlist>;

    fn into_iter(self) -> Self::IntoIter {
        self.playlists.iter()
    }
}
