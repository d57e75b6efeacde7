//! Armory catalog: weapons, relics, banners, and titles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::tiers::Tier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemId {
    IronDagger,
    BronzeMace,
    SilverSpear,
    GoldSaber,
    PlatinumHalberd,
    EmeraldBow,
    DiamondRapier,
    MasterStaff,
    GrandmasterBlade,
    ChallengerRelic,
    OldCoin,
    StepsTalisman,
    DreamCatcher,
    PhoenixFeather,
    BannerInitiate,
    BannerFlame,
    BannerGold,
    TitleRecruit,
    TitleConsistent,
    TitleSlayer,
    TitleIronbound,
    TitleLegacyS1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Weapon,
    Relic,
    Banner,
    Title,
}

/// Unlock band of an item: a ladder tier or a special grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemBand {
    Tier(Tier),
    Cosmetic,
    Legacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemDef {
    pub id: ItemId,
    pub slug: &'static str,
    pub name: &'static str,
    pub kind: ItemKind,
    pub band: ItemBand,
    pub description: &'static str,
    pub cp_bonus: i64,
    pub essence_bonus: i64,
    pub unlock_cost: i64,
}

const fn item(
    id: ItemId,
    slug: &'static str,
    name: &'static str,
    kind: ItemKind,
    band: ItemBand,
    description: &'static str,
    cp_bonus: i64,
    essence_bonus: i64,
    unlock_cost: i64,
) -> ItemDef {
    ItemDef {
        id,
        slug,
        name,
        kind,
        band,
        description,
        cp_bonus,
        essence_bonus,
        unlock_cost,
    }
}

use ItemBand::{Cosmetic, Legacy};
use ItemKind::{Banner, Relic, Title, Weapon};

pub static ITEMS: [ItemDef; 22] = [
    item(ItemId::IronDagger, "iron_dagger", "Iron Dagger", Weapon, ItemBand::Tier(Tier::Iron), "A rusted blade.", 0, 0, 0),
    item(ItemId::BronzeMace, "bronze_mace", "Bronze Mace", Weapon, ItemBand::Tier(Tier::Bronze), "Heavy hitter. +1 CP/win.", 1, 0, 100),
    item(ItemId::SilverSpear, "silver_spear", "Silver Spear", Weapon, ItemBand::Tier(Tier::Silver), "Precision. +2 CP/win.", 2, 0, 250),
    item(ItemId::GoldSaber, "gold_saber", "Gold Saber", Weapon, ItemBand::Tier(Tier::Gold), "Gilded edge. +3 CP/win.", 3, 0, 500),
    item(ItemId::PlatinumHalberd, "platinum_halberd", "Platinum Halberd", Weapon, ItemBand::Tier(Tier::Platinum), "Reach for glory. +4 CP/win.", 4, 0, 1000),
    item(ItemId::EmeraldBow, "emerald_bow", "Emerald Bow", Weapon, ItemBand::Tier(Tier::Emerald), "Nature's wrath. +5 CP/win.", 5, 0, 1500),
    item(ItemId::DiamondRapier, "diamond_rapier", "Diamond Rapier", Weapon, ItemBand::Tier(Tier::Diamond), "Flawless form. +6 CP/win.", 6, 0, 2500),
    item(ItemId::MasterStaff, "master_staff", "Master Staff", Weapon, ItemBand::Tier(Tier::Master), "Arcane power. +8 CP/win.", 8, 0, 5000),
    item(ItemId::GrandmasterBlade, "grandmaster_blade", "Grandmaster Blade", Weapon, ItemBand::Tier(Tier::Grandmaster), "Legendary cut. +10 CP/win.", 10, 0, 10_000),
    item(ItemId::ChallengerRelic, "challenger_relic", "Challenger Relic", Weapon, ItemBand::Tier(Tier::Challenger), "God tier artifact. +15 CP/win.", 15, 0, 25_000),
    item(ItemId::OldCoin, "old_coin", "Old Coin", Relic, ItemBand::Tier(Tier::Iron), "Good luck charm. +2 Essence/win.", 0, 2, 50),
    item(ItemId::StepsTalisman, "steps_talisman", "Talisman of Motion", Relic, ItemBand::Tier(Tier::Bronze), "Movement flows. +5 CP/win.", 5, 0, 150),
    item(ItemId::DreamCatcher, "dream_catcher", "Dream Catcher", Relic, ItemBand::Tier(Tier::Silver), "Restful thoughts. +5 Essence/win.", 0, 5, 300),
    item(ItemId::PhoenixFeather, "phoenix_feather", "Phoenix Feather", Relic, ItemBand::Tier(Tier::Gold), "Rise again. +10 CP/win.", 10, 0, 600),
    item(ItemId::BannerInitiate, "banner_initiate", "Initiate Banner", Banner, Cosmetic, "Standard issue.", 0, 0, 0),
    item(ItemId::BannerFlame, "banner_flame", "Flame Banner", Banner, Cosmetic, "Awarded for defeating Flame Tyrant.", 0, 0, 0),
    item(ItemId::BannerGold, "banner_gold", "Gilded Banner", Banner, ItemBand::Tier(Tier::Gold), "For those who strike gold.", 0, 0, 500),
    item(ItemId::TitleRecruit, "title_recruit", "Recruit", Title, Cosmetic, "Just started.", 0, 0, 0),
    item(ItemId::TitleConsistent, "title_consistent", "The Consistent", Title, Cosmetic, "7-Day Streak.", 0, 0, 0),
    item(ItemId::TitleSlayer, "title_slayer", "Boss Slayer", Title, Cosmetic, "Defeated a Boss.", 0, 0, 0),
    item(ItemId::TitleIronbound, "title_ironbound", "Ironbound", Title, ItemBand::Tier(Tier::Iron), "Forged in Iron.", 0, 0, 50),
    item(ItemId::TitleLegacyS1, "title_legacy_s1", "Awakened", Title, Legacy, "Season 1 Participant.", 0, 0, 0),
];

/// Weapons in catalog order; rival loadouts index into this list.
pub const WEAPONS: [ItemId; 10] = [
    ItemId::IronDagger,
    ItemId::BronzeMace,
    ItemId::SilverSpear,
    ItemId::GoldSaber,
    ItemId::PlatinumHalberd,
    ItemId::EmeraldBow,
    ItemId::DiamondRapier,
    ItemId::MasterStaff,
    ItemId::GrandmasterBlade,
    ItemId::ChallengerRelic,
];

/// Items every new player owns.
pub const STARTER_ITEMS: [ItemId; 3] = [
    ItemId::IronDagger,
    ItemId::TitleRecruit,
    ItemId::BannerInitiate,
];

impl ItemId {
    #[must_use]
    pub fn def(self) -> &'static ItemDef {
        // ITEMS is declared in enum order.
        &ITEMS[self as usize]
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.def().slug
    }

    #[must_use]
    pub fn kind(self) -> ItemKind {
        self.def().kind
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ITEMS.iter().find(|item| item.slug == s).map(|item| item.id).ok_or(())
    }
}

/// Equipped items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loadout {
    pub weapon_id: ItemId,
    #[serde(default)]
    pub relic_id: Option<ItemId>,
    #[serde(default)]
    pub banner_id: Option<ItemId>,
    #[serde(default)]
    pub title_id: Option<ItemId>,
}

impl Default for Loadout {
    fn default() -> Self {
        Self {
            weapon_id: ItemId::IronDagger,
            relic_id: None,
            banner_id: None,
            title_id: Some(ItemId::TitleRecruit),
        }
    }
}

impl Loadout {
    /// Flat CP granted per win by the weapon and relic.
    #[must_use]
    pub fn cp_bonus(&self) -> i64 {
        let weapon = self.weapon_id.def().cp_bonus;
        let relic = self.relic_id.map_or(0, |id| id.def().cp_bonus);
        weapon + relic
    }

    /// Flat essence granted per win by the relic.
    #[must_use]
    pub fn essence_bonus(&self) -> i64 {
        self.relic_id.map_or(0, |id| id.def().essence_bonus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_in_enum_order() {
        for (index, item) in ITEMS.iter().enumerate() {
            assert_eq!(item.id as usize, index, "{} out of order", item.slug);
            assert_eq!(item.slug.parse::<ItemId>(), Ok(item.id));
        }
    }

    #[test]
    fn serde_ids_match_slugs() {
        for item in &ITEMS {
            let json = serde_json::to_string(&item.id).unwrap();
            assert_eq!(json, format!("\"{}\"", item.slug));
        }
    }

    #[test]
    fn loadout_bonuses_combine_weapon_and_relic() {
        let loadout = Loadout {
            weapon_id: ItemId::GoldSaber,
            relic_id: Some(ItemId::PhoenixFeather),
            ..Loadout::default()
        };
        assert_eq!(loadout.cp_bonus(), 13);
        assert_eq!(loadout.essence_bonus(), 0);
        let coin = Loadout {
            relic_id: Some(ItemId::OldCoin),
            ..Loadout::default()
        };
        assert_eq!(coin.cp_bonus(), 0);
        assert_eq!(coin.essence_bonus(), 2);
    }
}
