//! 도메인 타입 -- 시스템 전역에서 사용되는 공통 타입
//!
//! 원시 로그 라인, 엔벨로프, 카테고리 분류 체계를 정의합니다.
//! 파이프라인과 다운스트림(알림, 상태 추적)이 이 타입들로 데이터를 교환합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 원시 로그 라인
///
/// 게임 클라이언트 로그의 한 물리 라인입니다. 수신 후에는 변경되지 않으며,
/// 수집기에서 파이프라인으로 소유권이 이동합니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawLine(String);

impl RawLine {
    /// 새 원시 라인을 생성합니다.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// 라인 텍스트를 반환합니다.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 내부 문자열을 꺼냅니다.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for RawLine {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for RawLine {
    fn from(text: &str) -> Self {
        Self(text.to_owned())
    }
}

impl fmt::Display for RawLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 엔벨로프 -- 라인 앞의 대괄호 타임스탬프와 나머지 페이로드
///
/// 엔벨로프가 생성되었다면 `payload`는 비어 있지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// `HH:MM:SS.00` 형식의 타임스탬프
    pub timestamp: String,
    /// 분류 대상 텍스트
    pub payload: String,
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp, self.payload)
    }
}

/// 규칙 그룹 종류
///
/// 캐스케이드는 [`RuleGroupKind::PRIORITY`] 순서로 그룹을 평가합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleGroupKind {
    /// 근접 전투
    Melee,
    /// 주문 효과
    Spell,
    /// 수신 채팅
    ReceivedChat,
    /// 발신 채팅
    SentChat,
    /// 명령 출력
    CommandOutput,
    /// 시스템 메시지
    SystemMessage,
    /// 그룹 메시지
    GroupMessage,
    /// 전리품/거래
    LootTrade,
    /// 감정 표현
    Emote,
    /// who 목록
    Who,
    /// 펫 응답
    Pet,
}

impl RuleGroupKind {
    /// 캐스케이드 평가 순서
    pub const PRIORITY: [RuleGroupKind; 11] = [
        Self::Melee,
        Self::Spell,
        Self::ReceivedChat,
        Self::SentChat,
        Self::CommandOutput,
        Self::SystemMessage,
        Self::GroupMessage,
        Self::LootTrade,
        Self::Emote,
        Self::Who,
        Self::Pet,
    ];

    /// 그룹 이름을 반환합니다.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Melee => "melee",
            Self::Spell => "spell",
            Self::ReceivedChat => "received_chat",
            Self::SentChat => "sent_chat",
            Self::CommandOutput => "command_output",
            Self::SystemMessage => "system_message",
            Self::GroupMessage => "group_message",
            Self::LootTrade => "loot_trade",
            Self::Emote => "emote",
            Self::Who => "who",
            Self::Pet => "pet",
        }
    }
}

impl fmt::Display for RuleGroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 그룹별 카테고리 목록에서 [`Category`] 열거형과 태그 변환을 생성합니다.
macro_rules! define_categories {
    ($( $group:ident { $( $variant:ident => $tag:literal ),+ $(,)? } )+) => {
        /// 라인 카테고리
        ///
        /// 빌드 시점에 닫힌 분류 체계입니다. 어떤 규칙에도 매칭되지 않은
        /// 페이로드는 [`Category::Undetermined`]로 분류됩니다.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum Category {
            $( $(
                #[serde(rename = $tag)]
                $variant,
            )+ )+
            /// 매칭 규칙 없음
            #[serde(rename = "undetermined")]
            Undetermined,
        }

        impl Category {
            /// 모든 카테고리 (그룹 우선순위 순, 마지막은 `Undetermined`)
            pub const ALL: &'static [Category] = &[
                $( $( Category::$variant, )+ )+
                Category::Undetermined,
            ];

            /// 와이어 태그를 반환합니다.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( $( Category::$variant => $tag, )+ )+
                    Category::Undetermined => "undetermined",
                }
            }

            /// 와이어 태그에서 카테고리를 찾습니다. 정확히 일치해야 합니다.
            pub fn from_tag(tag: &str) -> Option<Self> {
                match tag {
                    $( $( $tag => Some(Category::$variant), )+ )+
                    "undetermined" => Some(Category::Undetermined),
                    _ => None,
                }
            }

            /// 카테고리가 속한 규칙 그룹을 반환합니다.
            pub const fn group(self) -> Option<RuleGroupKind> {
                match self {
                    $( $( Category::$variant => Some(RuleGroupKind::$group), )+ )+
                    Category::Undetermined => None,
                }
            }
        }
    };
}

define_categories! {
    Melee {
        CombatOtherMelee => "combat_other_melee",
        CombatOtherMeleeMiss => "combat_other_melee_miss",
        CombatOtherMeleeDodge => "combat_other_melee_dodge",
        CombatOtherMeleeParry => "combat_other_melee_parry",
        CombatOtherMeleeBlock => "combat_other_melee_block",
        CombatOtherMeleeReposte => "combat_other_melee_reposte",
        CombatYouReceiveMelee => "combat_you_receive_melee",
        CombatYouMelee => "combat_you_melee",
        CombatYouMeleeMiss => "combat_you_melee_miss",
        CombatOtherMeleeCrit => "combat_other_melee_crit",
        MobEnrageOn => "mob_enrage_on",
        MobEnrageOff => "mob_enrage_off",
        MobRampageOn => "mob_rampage_on",
        MobSlainOther => "mob_slain_other",
        MobSlainYou => "mob_slain_you",
        MobOutOfRange => "mob_out_of_range",
        ExperienceSolo => "experience_solo",
        ExperienceGroup => "experience_group",
        CombatYouStunOn => "combat_you_stun_on",
        CombatYouStunOff => "combat_you_stun_off",
    }
    Spell {
        SpellCastOther => "spell_cast_other",
        SpellCastYou => "spell_cast_you",
        SpellFizzleOther => "spell_fizzle_other",
        SpellFizzleYou => "spell_fizzle_you",
        SpellNotHold => "spell_not_hold",
        SpellCastOom => "spell_cast_oom",
        SpellInterruptOther => "spell_interrupt_other",
        SpellInterruptYou => "spell_interrupt_you",
        SpellRecoverOther => "spell_recover_other",
        SpellRecoverYou => "spell_recover_you",
        SpellResistYou => "spell_resist_you",
        SpellDamage => "spell_damage",
        SpellMemorizeBegin => "spell_memorize_begin",
        SpellMemorizeFinish => "spell_memorize_finish",
        SpellMemorizeAlready => "spell_memorize_already",
        SpellForget => "spell_forget",
        SpellRegenOn => "spell_regen_on",
        SpellWornOff => "spell_worn_off",
        SpellHealYou => "spell_heal_you",
        SpellCured => "spell_cured",
        SpellGateCollapse => "spell_gate_collapse",
        SpellCooldownActive => "spell_cooldown_active",
    }
    ReceivedChat {
        Tell => "tell",
        Say => "say",
        Shout => "shout",
        Guild => "guild",
        Group => "group",
        Ooc => "ooc",
        AuctionWts => "auction_wts",
        AuctionWtb => "auction_wtb",
        Auction => "auction",
    }
    SentChat {
        YouTell => "you_tell",
        YouSay => "you_say",
        YouShout => "you_shout",
        YouGuild => "you_guild",
        YouGroup => "you_group",
        YouOoc => "you_ooc",
        YouAuction => "you_auction",
    }
    CommandOutput {
        Location => "location",
        Direction => "direction",
        DirectionMiss => "direction_miss",
        YouAfkOn => "you_afk_on",
        YouLfgOn => "you_lfg_on",
        YouAfkOff => "you_afk_off",
        YouLfgOff => "you_lfg_off",
        YouCamping => "you_camping",
        YouCampingAbandoned => "you_camping_abandoned",
        Random => "random",
        TimeGame => "time_game",
        TimeEarth => "time_earth",
        MotdGame => "motd_game",
        MotdGuild => "motd_guild",
        CommandBlock => "command_block",
    }
    SystemMessage {
        YouNewZone => "you_new_zone",
        Zoning => "zoning",
        YouOutFood => "you_outfood",
        YouOutDrink => "you_outdrink",
        YouOutFoodDrink => "you_outfooddrink",
        YouOutFoodLowDrink => "you_outfoodlowdrink",
        YouOutDrinkLowFood => "you_outdrinklowfood",
        YouThirsty => "you_thirsty",
        YouHungry => "you_hungry",
        EncumberedOff => "encumbered_off",
        EncumberedOn => "encumbered_on",
        SkillUp => "skill_up",
        DingUp => "ding_up",
        DingDown => "ding_down",
        WeatherStartRain => "weather_start_rain",
        WeatherStartSnow => "weather_start_snow",
        YouCannotReach => "you_cannot_reach",
        FactionLine => "faction_line",
        Engage => "engage",
        Target => "target",
        MotdWelcome => "motd_welcome",
        Tracking => "tracking",
    }
    GroupMessage {
        PlayerLinkdead => "player_linkdead",
        GroupJoined => "group_joined",
        GroupJoinedOther => "group_joined_other",
        GroupLeaveOther => "group_leave_other",
        GroupRemoved => "group_removed",
        GroupInviteOther => "group_invite_other",
        GroupInviteYou => "group_invite_you",
        GroupInviteInstruction => "group_invite_instruction",
        GroupDisbanded => "group_disbanded",
        GroupJoinNotify => "group_join_notify",
    }
    LootTrade {
        LootedItemOther => "looted_item_other",
        LootedItemYou => "looted_item_you",
        LootedMoneyYou => "looted_money_you",
        LootedMoneyOther => "looted_money_other",
        TradeMoney => "trade_money",
        TradeItem => "trade_item",
    }
    Emote {
        EmoteBowOther => "emote_bow_other",
        EmoteThankOther => "emote_thank_other",
        EmoteWaveOther => "emote_wave_other",
        EmoteDanceOther => "emote_dance_other",
        EmoteBonkOther => "emote_bonk_other",
        EmoteSmileOther => "emote_smile_other",
        EmoteCheerOther => "emote_cheer_other",
    }
    Who {
        WhoTop => "who_top",
        WhoTopFriends => "who_top_friends",
        WhoTopLfg => "who_top_lfg",
        WhoLine => "who_line",
        WhoPlayer => "who_player",
        WhoPlayerAfk => "who_player_afk",
        WhoPlayerLinkdead => "who_player_linkdead",
        WhoPlayerAnon => "who_player_anon",
        WhoPlayerAnonLinkdead => "who_player_anon_linkdead",
        WhoTotal => "who_total",
        WhoTotalEmpty => "who_total_empty",
        WhoTotalLocalEmpty => "who_total_local_empty",
    }
    Pet {
        PetFollow => "pet_follow",
        PetTauntOff => "pet_taunt_off",
        PetSpawn => "pet_spawn",
        PetSitStand => "pet_sit_stand",
        PetGuard => "pet_guard",
        PetBack => "pet_back",
        PetIllegalTarget => "pet_illegal_target",
    }
}

impl Category {
    /// 폴백 카테고리인지 확인합니다.
    pub fn is_undetermined(self) -> bool {
        self == Self::Undetermined
    }

    /// 특정 그룹에 속한 카테고리 목록을 정의 순서대로 반환합니다.
    pub fn in_group(group: RuleGroupKind) -> impl Iterator<Item = Category> {
        Self::ALL
            .iter()
            .copied()
            .filter(move |c| c.group() == Some(group))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn raw_line_conversions() {
        let line = RawLine::from("hello");
        assert_eq!(line.as_str(), "hello");
        assert_eq!(line.to_string(), "hello");
        assert_eq!(RawLine::new(String::from("x")).into_inner(), "x");
    }

    #[test]
    fn category_tags_are_unique() {
        let tags: HashSet<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(tags.len(), Category::ALL.len());
    }

    #[test]
    fn category_from_tag_is_exact() {
        assert_eq!(Category::from_tag("tell"), Some(Category::Tell));
        assert_eq!(
            Category::from_tag("you_outfooddrink"),
            Some(Category::YouOutFoodDrink)
        );
        assert_eq!(Category::from_tag("Tell"), None);
        assert_eq!(Category::from_tag(" tell"), None);
        assert_eq!(Category::from_tag(""), None);
    }

    #[test]
    fn every_tag_resolves_to_itself() {
        for category in Category::ALL {
            assert_eq!(Category::from_tag(category.as_str()), Some(*category));
        }
    }

    #[test]
    fn undetermined_is_last_and_groupless() {
        assert_eq!(Category::ALL.last(), Some(&Category::Undetermined));
        assert!(Category::Undetermined.group().is_none());
        assert!(Category::Undetermined.is_undetermined());
        assert!(!Category::Tell.is_undetermined());
    }

    #[test]
    fn every_other_category_has_a_group() {
        let grouped = Category::ALL.iter().filter(|c| c.group().is_some()).count();
        assert_eq!(grouped, Category::ALL.len() - 1);
    }

    #[test]
    fn group_membership() {
        assert_eq!(Category::CombatYouMelee.group(), Some(RuleGroupKind::Melee));
        assert_eq!(Category::YouAuction.group(), Some(RuleGroupKind::SentChat));
        assert_eq!(Category::WhoPlayerAnon.group(), Some(RuleGroupKind::Who));
        assert_eq!(Category::in_group(RuleGroupKind::SentChat).count(), 7);
        assert_eq!(
            Category::in_group(RuleGroupKind::ReceivedChat).last(),
            Some(Category::Auction)
        );
    }

    #[test]
    fn category_serializes_as_tag() {
        let json = serde_json::to_string(&Category::CombatYouReceiveMelee).unwrap();
        assert_eq!(json, "\"combat_you_receive_melee\"");
        let parsed: Category = serde_json::from_str("\"undetermined\"").unwrap();
        assert_eq!(parsed, Category::Undetermined);
        assert!(serde_json::from_str::<Category>("\"not_a_tag\"").is_err());
    }

    #[test]
    fn group_priority_order() {
        assert_eq!(RuleGroupKind::PRIORITY[0], RuleGroupKind::Melee);
        assert_eq!(RuleGroupKind::PRIORITY[10], RuleGroupKind::Pet);
        assert_eq!(RuleGroupKind::SentChat.to_string(), "sent_chat");
    }

    #[test]
    fn envelope_display() {
        let envelope = Envelope {
            timestamp: "12:34:56.00".to_owned(),
            payload: "hi".to_owned(),
        };
        assert_eq!(envelope.to_string(), "[12:34:56.00] hi");
    }
}
