use crate::error::HarvestError;
use std::fs;
use std::path::Path;

/// Rules applied when no custom rule list is given
///
/// Each entry is `<msg type>@<path>[#<hook>]`; the string itself is the rule
/// key and names the output file.
pub const BUILTIN_SPECS: &[&str] = &[
    "game_ended@message",
    "map@cells[].mon.name",
    "map@cells[].mon.plural",
    "menu@alt_more",
    "menu@items[].text",
    "menu@more",
    "menu@title.text",
    "msgs@messages[].text",
    "msgs@messages[].text#tokenize",
    "player@god",
    "player@inv[o].inscription",
    "player@inv[o].name",
    "player@inv[o].qty_field",
    "player@inv[o].action_verb",
    "player@place",
    "player@quiver_desc",
    "player@species",
    "player@status[].desc",
    "player@status[].light",
    "player@status[].text",
    "player@title",
    "player@unarmed_attack",
    "txt@lines[o]",
    "ui-push@actions",
    "ui-push@body",
    "ui-push@body#quote",
    "ui-push@body#lines",
    "ui-push@highlight",
    "ui-push@main-items.buttons[].description",
    "ui-push@main-items.buttons[].labels[]",
    "ui-push@main-items.labels[].label",
    "ui-push@more",
    "ui-push@prompt",
    "ui-push@quote",
    "ui-push@spellset[].label",
    "ui-push@spellset[].spells[].effect",
    "ui-push@spellset[].spells[].letter",
    "ui-push@spellset[].spells[].range_string",
    "ui-push@spellset[].spells[].schools",
    "ui-push@spellset[].spells[].title",
    "ui-push@sub-items.buttons[].description",
    "ui-push@sub-items.buttons[].label",
    "ui-push@text",
    "ui-push@text#lines",
    "ui-push@text#tokenize",
    "ui-push@title",
    "ui-push@feats[].title",
    "ui-push@teats[].body",
    "ui-state@highlight",
    "ui-state@text",
    "update_menu@alt_more",
    "update_menu@more",
    "update_menu@title.text",
    "update_menu_items@items[].text",
    "init_input@prompt",
    "version@text",
];

/// Read rule specs from a text file, one per line
///
/// Blank lines and lines starting with `//` are ignored; surrounding
/// whitespace is trimmed.
pub fn read_spec_file(path: &Path) -> Result<Vec<String>, HarvestError> {
    let text = fs::read_to_string(path).map_err(|e| HarvestError::io(path, e))?;
    Ok(parse_spec_list(&text))
}

fn parse_spec_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("//"))
        .map(str::to_string)
        .collect()
}
