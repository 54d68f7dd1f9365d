//! Boilerplate contents of newly created data files.

use crate::naming::{PassageRef, capitalize};
use clap::ValueEnum;

pub fn character_file(id: &str, name: &str) -> String {
    let symbol = capitalize(id);
    format!(
        "import {{ TCharacter }} from 'types/TCharacter';

export const {symbol}: TCharacter<'{id}'> = {{
\tid: '{id}',
\tname: _('{name}'),
\tgeneral_description: ``,
\tstart_passage_Id: undefined,
\t
\tinit: {{
\t\thealth: 100,
\t\thunger: 100,
\t\tstamina: 100,
\t\tinventory: [],
\t\tlocation: undefined,
\t}},
}};

export type T{symbol}CharacterData = {{
\t
}};
"
    )
}

pub fn side_character_file(id: &str, name: &str) -> String {
    let symbol = capitalize(id);
    format!(
        "import {{ TSideCharacter }} from 'types/TCharacter';

export const {symbol}: TSideCharacter<'{id}'> = {{
\tid: '{id}',
\tname: _('{name}'),
\tgeneral_description: ``,
\t
\tinit: {{
\t\tinventory: [],
\t\tlocation: undefined,
\t\tis_dead: false,
\t}},
}};

export type T{symbol}SideCharacterData = {{
\t
}};
"
    )
}

pub fn location_file(id: &str, name: &str) -> String {
    let symbol = capitalize(id);
    format!(
        "import {{ TLocation }} from 'types/TLocation';

export const {id}Location: TLocation<'{id}'> = {{
\tid: '{id}',
\tname: _('{name}'),
\tdescription: '',
\t
\tlocalCharacters: [
\t],
\tinit: {{}},
}};

export type T{symbol}LocationData = {{
\tvoid?: void;
}};
"
    )
}

pub const UNKNOWN_LOCATION: &str = "unknown";
pub const UNSET_TIME: &str = "0.0 0:0";

/// Everything an event file is rendered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventArgs {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start: String,
    pub end: String,
    pub location: String,
}

impl EventArgs {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            start: UNSET_TIME.to_string(),
            end: UNSET_TIME.to_string(),
            location: UNKNOWN_LOCATION.to_string(),
        }
    }
}

pub fn event_file(args: &EventArgs) -> String {
    let EventArgs {
        id,
        title,
        description,
        start,
        end,
        location,
    } = args;
    let symbol = capitalize(id);
    format!(
        "import {{ Time, TimeRange }} from 'time/Time';
import {{ TEvent }} from 'types/TEvent';

export const {id}Event: TEvent<'{id}'> = {{
\teventId: '{id}',
\ttitle: _('{title}'),
\tdescription: `{description}`,
\ttimeRange: TimeRange.fromString('{start}', '{end}'),
\tlocation: '{location}',
\t
\tchildren: [],
\t
\ttriggers: [],
\t
\tinit: {{}},
}};

export type T{symbol}EventData = {{
\t
}};
"
    )
}

/// `T<Event>PassageId`, the union of every passage id of one event.
pub fn passage_id_type(event_id: &str) -> String {
    format!("T{}PassageId", capitalize(event_id))
}

pub fn event_passages_symbol(event_id: &str) -> String {
    format!("{event_id}EventPassages")
}

/// Header text of the passage record in `<event>.passages.ts`, up to the `=`.
pub fn event_passages_container(event_id: &str) -> String {
    format!(
        "{}: Record<{}, (s: TWorldState, e: Engine) => TEventPassage<'{event_id}'>>",
        event_passages_symbol(event_id),
        passage_id_type(event_id),
    )
}

pub fn event_passages_file(event_id: &str) -> String {
    let symbol = event_passages_symbol(event_id);
    format!(
        "import {{ Engine }} from 'code/Engine/ts/Engine';
import {{ TWorldState }} from 'data/TWorldState';
import {{ TEventPassage }} from 'types/TPassage';

export type {} = never;

const {} = {{
}};

export default {symbol};
",
        passage_id_type(event_id),
        event_passages_container(event_id),
    )
}

/// Header text of the race record in the races file, up to the `=`.
pub const RACES_CONTAINER: &str = "races: Record<TRace['name'], TRace>";

pub fn races_file() -> String {
    format!(
        "import {{ TRace }} from 'types/TCharacter';

export const {RACES_CONTAINER} = {{
\thuman: {{
\t\tname: _('Human'),
\t\tdescription: _(''),
\t}},
}};
"
    )
}

pub fn race_entry(id: &str, name: &str, description: &str) -> String {
    format!("{id}: {{\n\tname: _('{name}'),\n\tdescription: _('{description}'),\n}}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PassageKind {
    Screen,
    Linear,
    Transition,
    LinearDescriber,
}

impl PassageKind {
    /// Middle part of the passage file name, `<passage>.<tag>.ts`.
    pub fn file_tag(self) -> &'static str {
        match self {
            PassageKind::Screen => "screen",
            PassageKind::Linear => "linear",
            PassageKind::Transition => "transition",
            PassageKind::LinearDescriber => "linearDescriber",
        }
    }

    /// Renders the passage file. `title` is used by screen passages, `link`
    /// names the passage a screen link or a transition leads to.
    pub fn render(self, passage: &PassageRef, title: Option<&str>, link: Option<&str>) -> String {
        let PassageRef {
            event,
            character,
            passage: passage_id,
        } = passage;
        let symbol = passage.symbol();
        let header = format!(
            "import {{ DeltaTime }} from 'time/Time';
import {{ TPassage }} from 'types/TPassage';

export const {symbol} = (): TPassage<'{event}', '{character}'> => ({{
\teventId: '{event}',
\tcharacterId: '{character}',
\tid: '{passage_id}',
"
        );

        let mut body = match self {
            PassageKind::Screen => format!(
                "
\ttype: 'screen',
\ttitle: _('{}'),
\timage: '',

\tbody: [
\t\t{{
\t\t\tcondition: true,
\t\t\ttext: _(''),
\t\t\tlinks: [
\t\t\t\t{{
\t\t\t\t\ttext: _(''),
\t\t\t\t\tpassageId: '{event}-{character}-{}',
\t\t\t\t\tcost: {{
\t\t\t\t\t\ttime: DeltaTime.fromMin(),
\t\t\t\t\t}},
\t\t\t\t\tautoPriortiy: 1,
\t\t\t\t}},
\t\t\t],
\t\t}},
\t],
",
                title.unwrap_or(""),
                link.unwrap_or(""),
            ),
            PassageKind::Linear | PassageKind::LinearDescriber => {
                "\ttype: 'linear',\n\tdescription: _(''),\n\tnextPassageId: undefined,\n".to_string()
            }
            PassageKind::Transition => format!(
                "\ttype: 'transition',\n\tnextPassageId: '{event}-{character}-{}',\n",
                link.unwrap_or(passage_id),
            ),
        };
        body.push_str("});\n");
        header + &body
    }
}
