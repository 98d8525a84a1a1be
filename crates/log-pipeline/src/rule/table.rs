//! 내장 분류 규칙 테이블
//!
//! 그룹은 평가 우선순위 순서로, 그룹 안의 규칙은 정의 순서로 나열됩니다.
//! 패턴은 페이로드 전체에 앵커링되므로 `^`/`$`를 적지 않습니다
//! (컴파일 시 `^(?:...)$`로 감쌉니다).
//!
//! 동시에 매칭될 수 있는 패턴 사이의 순서는 분류 결과의 일부입니다.
//! 예를 들어 `auction_wts`/`auction_wtb`는 일반 `auction`보다 먼저 와야 합니다.

use eqalert_core::types::{Category, RuleGroupKind};

/// 규칙 정의 -- 패턴과 카테고리 쌍
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    /// 정규식 패턴 (앵커 없음)
    pub pattern: &'static str,
    /// 매칭 시 결정되는 카테고리
    pub category: Category,
}

/// 그룹 정의 -- 순서가 있는 규칙 목록
#[derive(Debug, Clone, Copy)]
pub struct GroupSpec {
    /// 그룹 종류
    pub kind: RuleGroupKind,
    /// 정의 순서대로 평가되는 규칙
    pub rules: &'static [RuleSpec],
}

const fn rule(pattern: &'static str, category: Category) -> RuleSpec {
    RuleSpec { pattern, category }
}

/// 내장 캐스케이드 (우선순위 순)
pub const BUILTIN_GROUPS: &[GroupSpec] = &[
    GroupSpec {
        kind: RuleGroupKind::Melee,
        rules: MELEE,
    },
    GroupSpec {
        kind: RuleGroupKind::Spell,
        rules: SPELL,
    },
    GroupSpec {
        kind: RuleGroupKind::ReceivedChat,
        rules: RECEIVED_CHAT,
    },
    GroupSpec {
        kind: RuleGroupKind::SentChat,
        rules: SENT_CHAT,
    },
    GroupSpec {
        kind: RuleGroupKind::CommandOutput,
        rules: COMMAND_OUTPUT,
    },
    GroupSpec {
        kind: RuleGroupKind::SystemMessage,
        rules: SYSTEM_MESSAGE,
    },
    GroupSpec {
        kind: RuleGroupKind::GroupMessage,
        rules: GROUP_MESSAGE,
    },
    GroupSpec {
        kind: RuleGroupKind::LootTrade,
        rules: LOOT_TRADE,
    },
    GroupSpec {
        kind: RuleGroupKind::Emote,
        rules: EMOTE,
    },
    GroupSpec {
        kind: RuleGroupKind::Who,
        rules: WHO,
    },
    GroupSpec {
        kind: RuleGroupKind::Pet,
        rules: PET,
    },
];

// 몹 이름에는 아포스트로피가 들어갈 수 있음 (Tanar'Ri).
// "X hits you" 는 "X hits Y" 보다 먼저 검사해야 함.
const MELEE: &[RuleSpec] = &[
    rule(
        r"[a-zA-Z\s']+ (?:hits|crushes|slashes|pierces|bashes|backstabs|bites|kicks|claws|gores|punches|strikes|slices) you for \d+ points of damage\.",
        Category::CombatYouReceiveMelee,
    ),
    rule(
        r"[a-zA-Z\s']+ (?:hits|crushes|slashes|pierces|bashes|backstabs|bites|kicks|claws|gores|punches|strikes|slices) [a-zA-Z\s']+ for \d+ points of damage\.",
        Category::CombatOtherMelee,
    ),
    rule(
        r"[a-zA-Z\s']+ tries to (?:hit|crush|slash|pierce|bash|backstab|bite|kick|claw|gore|punch|strike|slice) [a-zA-Z\s']+, but misses!",
        Category::CombatOtherMeleeMiss,
    ),
    rule(
        r"[a-zA-Z\s']+ tries to (?:hit|crush|slash|pierce|bash|backstab|bite|kick|claw|gore|punch|strike|slice) [a-zA-Z\s']+, but [a-zA-Z\s']+ dodges!",
        Category::CombatOtherMeleeDodge,
    ),
    rule(
        r"[a-zA-Z\s']+ tries to (?:hit|crush|slash|pierce|bash|backstab|bite|kick|claw|gore|punch|strike|slice) [a-zA-Z\s']+, but [a-zA-Z\s']+ parries!",
        Category::CombatOtherMeleeParry,
    ),
    rule(
        r"[a-zA-Z\s']+ tries to (?:hit|crush|slash|pierce|bash|backstab|bite|kick|claw|gore|punch|strike|slice) [a-zA-Z\s']+, but [a-zA-Z\s']+ blocks!",
        Category::CombatOtherMeleeBlock,
    ),
    rule(
        r"[a-zA-Z\s']+ tries to (?:hit|crush|slash|pierce|bash|backstab|bite|kick|claw|gore|punch|strike|slice) [a-zA-Z\s']+, but [a-zA-Z\s']+ ripostes!",
        Category::CombatOtherMeleeReposte,
    ),
    rule(
        r"You (?:hit|crush|slash|pierce|bash|backstab|bite|kick|claw|gore|punch|strike|slice) [a-zA-Z\s']+ for \d+ points of damage\.",
        Category::CombatYouMelee,
    ),
    rule(
        r"You try to (?:hit|crush|slash|pierce|bash|backstab|bite|kick|claw|gore|punch|strike|slice) [a-zA-Z\s']+, but miss!",
        Category::CombatYouMeleeMiss,
    ),
    rule(
        r"[a-zA-Z\s']+ Scores a critical hit!\(\d+\)",
        Category::CombatOtherMeleeCrit,
    ),
    rule(
        r"[a-zA-Z\s']+ has become (?:ENRAGED|enraged)\.",
        Category::MobEnrageOn,
    ),
    rule(r"[a-zA-Z\s']+ is no longer enraged\.", Category::MobEnrageOff),
    rule(
        r"[a-zA-Z\s']+ goes on a (?:RAMPAGE|rampage)\.",
        Category::MobRampageOn,
    ),
    rule(
        r"[a-zA-Z\s']+ has been slain by [a-zA-Z\s']+!",
        Category::MobSlainOther,
    ),
    rule(r"You have slain [a-zA-Z\s']+!", Category::MobSlainYou),
    rule(
        r"Your target is out of range, get closer!",
        Category::MobOutOfRange,
    ),
    rule(r"You gain experience!!", Category::ExperienceSolo),
    rule(r"You gain party experience!!", Category::ExperienceGroup),
    rule(r"You are stunned!", Category::CombatYouStunOn),
    rule(r"You are unstunned\.", Category::CombatYouStunOff),
];

const SPELL: &[RuleSpec] = &[
    rule(
        r"[a-zA-Z\s]+ begins to cast a spell\.",
        Category::SpellCastOther,
    ),
    rule(r"You begin casting [a-zA-Z\s]+\.", Category::SpellCastYou),
    rule(r"\w+'s spell fizzles!", Category::SpellFizzleOther),
    rule(r"Your spell fizzles!", Category::SpellFizzleYou),
    rule(r"Your spell did not take hold\.", Category::SpellNotHold),
    rule(
        r"Insufficient Mana to cast this spell!",
        Category::SpellCastOom,
    ),
    rule(
        r"[a-zA-Z\s]+'s casting is interrupted!",
        Category::SpellInterruptOther,
    ),
    rule(r"Your spell is interrupted\.", Category::SpellInterruptYou),
    rule(
        r"[a-zA-Z\s]+ regains concentration and continues casting\.",
        Category::SpellRecoverOther,
    ),
    rule(
        r"You regain your concentration and continue your casting\.",
        Category::SpellRecoverYou,
    ),
    rule(
        r"Your target resisted the .+ spell\.",
        Category::SpellResistYou,
    ),
    rule(
        r".+ w(?:ere|as) hit by non-melee for \d+ ?points of damage\.",
        Category::SpellDamage,
    ),
    rule(
        r"Beginning to memorize [a-zA-Z\s':]+\.\.\.",
        Category::SpellMemorizeBegin,
    ),
    rule(
        r"You have finished memorizing [a-zA-Z\s':]+\.",
        Category::SpellMemorizeFinish,
    ),
    rule(
        r"You cannot memorize a spell you already have memorized\.",
        Category::SpellMemorizeAlready,
    ),
    rule(r"You forget .+\.", Category::SpellForget),
    rule(r"\w+ begins to regenerate\.", Category::SpellRegenOn),
    rule(
        r"Your [a-zA-Z\s]+ spell has worn off\.",
        Category::SpellWornOff,
    ),
    rule(
        r"You have healed .+ for \d+ points of damage\.",
        Category::SpellHealYou,
    ),
    rule(r"Your target has been cured\.", Category::SpellCured),
    rule(
        r"Your gate is too unstable, and collapses\.",
        Category::SpellGateCollapse,
    ),
    rule(
        r"You haven't recovered yet\.\.\.",
        Category::SpellCooldownActive,
    ),
];

const RECEIVED_CHAT: &[RuleSpec] = &[
    rule(r"\w+ tells you, '.+'", Category::Tell),
    rule(r"\w+ says, '.+'", Category::Say),
    rule(r"\w+ shouts, '.+'", Category::Shout),
    rule(r"\w+ tells the guild, '.+'", Category::Guild),
    rule(r"\w+ tells the group, '.+'", Category::Group),
    rule(r"\w+ says out of character, '.+'", Category::Ooc),
    rule(
        r"\w+ auctions, '.*(?:WTS|selling|Selling).*'",
        Category::AuctionWts,
    ),
    rule(
        r"\w+ auctions, '.*(?:WTB|buying|Buying).*'",
        Category::AuctionWtb,
    ),
    rule(r"\w+ auctions, '.+'", Category::Auction),
];

const SENT_CHAT: &[RuleSpec] = &[
    rule(
        r"You told \w+(?:, '| '\[queued\],).+'",
        Category::YouTell,
    ),
    rule(r"You say, '.+'", Category::YouSay),
    rule(r"You shout, '.+'", Category::YouShout),
    rule(r"You say to your guild, '.+'", Category::YouGuild),
    rule(r"You tell your party, '.+'", Category::YouGroup),
    rule(r"You say out of character, '.+'", Category::YouOoc),
    rule(r"You auction, '.+'", Category::YouAuction),
];

const COMMAND_OUTPUT: &[RuleSpec] = &[
    rule(
        r"Your Location is -?(?:\d*\.)?\d+, -?(?:\d*\.)?\d+, -?(?:\d*\.)?\d+",
        Category::Location,
    ),
    rule(
        r"You think you are heading (?:North(?:East|West)?|South(?:East|West)?|(?:Ea|We)st)\.",
        Category::Direction,
    ),
    rule(
        r"You have no idea what direction you are facing\.",
        Category::DirectionMiss,
    ),
    rule(
        r"You are now A\.F\.K\. \(Away From Keyboard\)\.",
        Category::YouAfkOn,
    ),
    rule(r"You are now Looking For a Group\.", Category::YouLfgOn),
    rule(
        r"You are no longer A\.F\.K\. \(Away From Keyboard\)\.",
        Category::YouAfkOff,
    ),
    rule(
        r"You are no longer Looking For a Group\.",
        Category::YouLfgOff,
    ),
    rule(
        r"It will take (?:you )?about (?:30|25|20|15|10|5) (?:more )?seconds to prepare your camp\.",
        Category::YouCamping,
    ),
    rule(
        r"You abandon your preparations to camp\.",
        Category::YouCampingAbandoned,
    ),
    rule(r"\*\*.+", Category::Random),
    rule(r"Game Time:.+", Category::TimeGame),
    rule(r"Earth Time:.+", Category::TimeEarth),
    rule(r"MESSAGE OF THE DAY:.+", Category::MotdGame),
    rule(r"GUILD MOTD:.+", Category::MotdGuild),
    rule(
        r"You can't use that command while casting\.\.\.",
        Category::CommandBlock,
    ),
];

// "You are out of ..." 계열은 구체적인 것부터.
const SYSTEM_MESSAGE: &[RuleSpec] = &[
    rule(r"You have entered [a-zA-Z\s':]+\.", Category::YouNewZone),
    rule(r"LOADING, PLEASE WAIT\.\.\.", Category::Zoning),
    rule(
        r"You are out of food and drink\.",
        Category::YouOutFoodDrink,
    ),
    rule(
        r"You are out of food and low on drink\.",
        Category::YouOutFoodLowDrink,
    ),
    rule(
        r"You are out of drink and low on food\.",
        Category::YouOutDrinkLowFood,
    ),
    rule(r"You are out of food\.", Category::YouOutFood),
    rule(r"You are out of drink\.", Category::YouOutDrink),
    rule(r"You are thirsty\.", Category::YouThirsty),
    rule(r"You are hungry\.", Category::YouHungry),
    rule(
        r"You are no longer encumbered\.",
        Category::EncumberedOff,
    ),
    rule(r"You are encumbered!", Category::EncumberedOn),
    rule(
        r"You have become better at [a-zA-Z\s]+! \(\d+\)",
        Category::SkillUp,
    ),
    rule(r"Welcome to level \d+!", Category::DingUp),
    rule(
        r"You LOST a level! You are now level \d+!",
        Category::DingDown,
    ),
    rule(r"It begins to rain\.", Category::WeatherStartRain),
    rule(r"It begins to snow\.", Category::WeatherStartSnow),
    rule(
        r"You can't reach that, get closer\.",
        Category::YouCannotReach,
    ),
    rule(
        r"Your faction standing with \w+ (?:could not possibly get any|got) (?:better|worse)\.",
        Category::FactionLine,
    ),
    rule(r"[a-zA-Z\s]+ engages \w+!", Category::Engage),
    rule(
        r"Targeted \((?:NPC|Player)\): [a-zA-Z\s]+|You no longer have a target\.",
        Category::Target,
    ),
    rule(r"Welcome to EverQuest!", Category::MotdWelcome),
    rule(
        r"[a-zA-Z\s]+ is (?:behind and to the (?:righ|lef)t\.|ahead and to the (?:righ|lef)t\.|(?:straight ahead|behind you)\.|to the (?:righ|lef)t\.)",
        Category::Tracking,
    ),
];

const GROUP_MESSAGE: &[RuleSpec] = &[
    rule(r"[a-zA-Z]+ has gone Linkdead.", Category::PlayerLinkdead),
    rule(r"You have joined the group\.", Category::GroupJoined),
    rule(r"\w+ has joined the group\.", Category::GroupJoinedOther),
    rule(r"\w+ has left the group\.", Category::GroupLeaveOther),
    rule(
        r"You have been removed from the group\.",
        Category::GroupRemoved,
    ),
    rule(
        r"You invite [a-zA-Z]+ to join your group\.",
        Category::GroupInviteOther,
    ),
    rule(
        r"[a-zA-Z]+ invites you to join a group\.",
        Category::GroupInviteYou,
    ),
    rule(
        r"To join the group, click on the 'FOLLOW' option, or 'DISBAND' to cancel\.",
        Category::GroupInviteInstruction,
    ),
    rule(
        r"Your group has been disbanded\.",
        Category::GroupDisbanded,
    ),
    rule(
        r"You notify [a-zA-Z]+ that you agree to join the group\.",
        Category::GroupJoinNotify,
    ),
];

const LOOT_TRADE: &[RuleSpec] = &[
    rule(
        r"--\w+ has looted [a-zA-Z\s:]+\.--",
        Category::LootedItemOther,
    ),
    rule(
        r"--You have looted [a-zA-Z\s:]+\.--",
        Category::LootedItemYou,
    ),
    rule(
        r"You receive (?:\d+ platinum, )?(?:\d+ gold, )?(?:\d+ silver and )?\d+ copper from the corpse\.",
        Category::LootedMoneyYou,
    ),
    rule(
        r"You receive \d+ platinum, \d+ gold, \d+ silver, \d+ copper as your split\.",
        Category::LootedMoneyOther,
    ),
    rule(
        r"The total trade is: \d+ PP, \d+ GP, \d+ SP, \d+ CP",
        Category::TradeMoney,
    ),
    rule(
        r"[a-zA-Z]+ has offered you [a-zA-Z\s]+\.",
        Category::TradeItem,
    ),
];

const EMOTE: &[RuleSpec] = &[
    rule(r"\w+ bows before \w+\.", Category::EmoteBowOther),
    rule(r"\w+ thanks \w+ heartily\.", Category::EmoteThankOther),
    rule(r"\w+ waves at \w+\.", Category::EmoteWaveOther),
    rule(
        r"\w+ grabs hold of \w+ and begins to dance with (?:h(?:er|im)|it)\.",
        Category::EmoteDanceOther,
    ),
    rule(r"\w+ bonks \w+ on the head!", Category::EmoteBonkOther),
    rule(r"\w+ beams a smile at a? \w+", Category::EmoteSmileOther),
    rule(r"\w+ cheers at \w+", Category::EmoteCheerOther),
];

// 익명 항목은 길드 앞에 공백이 두 칸인 형태만 매칭됨 (중간 `$` 이후 그룹은 항상 빈 매칭).
const WHO: &[RuleSpec] = &[
    rule(r"Players (?:on|in) EverQuest:", Category::WhoTop),
    rule(r"Friends currently on EverQuest:", Category::WhoTopFriends),
    rule(r"Players Looking For Groups:", Category::WhoTopLfg),
    rule(r"---------------------------", Category::WhoLine),
    rule(
        r"\[\d+ (?:(?:(?:Shadow )?Knigh|Hierophan|Revenan)t|(?:Elemental|Phantasm)ist|High Priest|Illusionist|(?:Grandmast|P(?:athfind|reserv)|C(?:hannel|avali)|(?:Enchan|Mas)t|(?:Begu|Def)il|Conjur|Sorcer|Wa(?:nder|rd)|(?:Crusa|Outri)d|Rang|Evok|Reav)er|Necromancer|(?:B(?:lackgu)?|Wiz)ard|Grave Lord|(?:T(?:roubadou|empla)|Warrio|Vica)r|A(?:rch Mage|ssassin)|Minstrel|Virtuoso|(?:(?:Myrmid|Champi)o|Magicia|Shama)n|(?:Discipl|Oracl|R(?:ogu|ak))e|Luminary|Warlock|Heretic|Paladin|(?:Warlor|Drui)d|Cleric|Mystic|Monk)\] \w+ \((?:Barbarian|Halfling|Half-Elf|(?:Dark|High) Elf|Wood Elf|Skeleton|Erudite|Iksar|Troll|(?:Gnom|Ogr)e|Dwarf|Human)\)(?: <[a-zA-Z\s]+> ZONE: \w+| <[a-zA-Z\s]+>)?",
        Category::WhoPlayer,
    ),
    rule(
        r"AFK \[\d+ (?:(?:(?:Shadow )?Knigh|Hierophan|Revenan)t|(?:Elemental|Phantasm)ist|High Priest|Illusionist|(?:Grandmast|P(?:athfind|reserv)|C(?:hannel|avali)|(?:Enchan|Mas)t|(?:Begu|Def)il|Conjur|Sorcer|Wa(?:nder|rd)|(?:Crusa|Outri)d|Rang|Evok|Reav)er|Necromancer|(?:B(?:lackgu)?|Wiz)ard|Grave Lord|(?:T(?:roubadou|empla)|Warrio|Vica)r|A(?:rch Mage|ssassin)|Minstrel|Virtuoso|(?:(?:Myrmid|Champi)o|Magicia|Shama)n|(?:Discipl|Oracl|R(?:ogu|ak))e|Luminary|Warlock|Heretic|Paladin|(?:Warlor|Drui)d|Cleric|Mystic|Monk)\] \w+ \((?:Barbarian|Halfling|Half-Elf|(?:Dark|High) Elf|Wood Elf|Skeleton|Erudite|Iksar|Troll|(?:Gnom|Ogr)e|Dwarf|Human)\)(?: <[a-zA-Z\s]+> ZONE: \w+| <[a-zA-Z\s]+>)?",
        Category::WhoPlayerAfk,
    ),
    rule(
        r"<LINKDEAD>\[\d+ (?:(?:(?:Shadow )?Knigh|Hierophan|Revenan)t|(?:Elemental|Phantasm)ist|High Priest|Illusionist|(?:Grandmast|P(?:athfind|reserv)|C(?:hannel|avali)|(?:Enchan|Mas)t|(?:Begu|Def)il|Conjur|Sorcer|Wa(?:nder|rd)|(?:Crusa|Outri)d|Rang|Evok|Reav)er|Necromancer|(?:B(?:lackgu)?|Wiz)ard|Grave Lord|(?:T(?:roubadou|empla)|Warrio|Vica)r|A(?:rch Mage|ssassin)|Minstrel|Virtuoso|(?:(?:Myrmid|Champi)o|Magicia|Shama)n|(?:Discipl|Oracl|R(?:ogu|ak))e|Luminary|Warlock|Heretic|Paladin|(?:Warlor|Drui)d|Cleric|Mystic|Monk)\] \w+ \((?:Barbarian|Halfling|Half-Elf|(?:Dark|High) Elf|Wood Elf|Skeleton|Erudite|Iksar|Troll|(?:Gnom|Ogr)e|Dwarf|Human)\)(?: <[a-zA-Z\s]+> ZONE: \w+| <[a-zA-Z\s]+>)?",
        Category::WhoPlayerLinkdead,
    ),
    rule(
        r"\[ANONYMOUS\] \w+ (?: <[a-zA-Z\s]+>)$(?: <[a-zA-Z\s]+> ZONE: \w+| <[a-zA-Z\s]+>)?",
        Category::WhoPlayerAnon,
    ),
    rule(
        r"<LINKDEAD>\[ANONYMOUS\] \w+ (?: <[a-zA-Z\s]+>)$(?: <[a-zA-Z\s]+> ZONE: \w+| <[a-zA-Z\s]+>)?",
        Category::WhoPlayerAnonLinkdead,
    ),
    rule(
        r"There (?:is|are) \d+ (?:player|players) in [a-zA-Z\s]+\.",
        Category::WhoTotal,
    ),
    rule(
        r"There are no players in EverQuest that match those who filters\.",
        Category::WhoTotalEmpty,
    ),
    rule(
        r"There are no players in [a-zA-Z\s]+ that match those who filters\.",
        Category::WhoTotalLocalEmpty,
    ),
];

// 한 단어 이름의 펫 응답은 수신 채팅(say)이 먼저 가져감.
const PET: &[RuleSpec] = &[
    rule(
        r"[a-zA-Z\s]+ says, 'Following you, Master\.'",
        Category::PetFollow,
    ),
    rule(
        r"[a-zA-Z\s]+ says, 'No longer taunting attackers, Master\.'",
        Category::PetTauntOff,
    ),
    rule(
        r"[a-zA-Z\s]+ says, 'At your service Master\.'",
        Category::PetSpawn,
    ),
    rule(
        r"[a-zA-Z\s]+ says, 'Changing position, Master\.'",
        Category::PetSitStand,
    ),
    rule(
        r"[a-zA-Z\s]+ says, 'Guarding with my life\.\.oh splendid one\.'",
        Category::PetGuard,
    ),
    rule(
        r"[a-zA-Z\s]+ says, 'Sorry, Master\.\.calming down\.'",
        Category::PetBack,
    ),
    rule(
        r"[a-zA-Z\s]+ says, 'That is not a legal target master\.'",
        Category::PetIllegalTarget,
    ),
];
