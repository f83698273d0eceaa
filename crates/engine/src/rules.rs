use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use roxmltree::{Document, Node};

use crate::world::UnitStance;

/// Identifier used to query whether an actor exposes a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    BaseBuilding,
    Production,
    Guard,
    AutoTarget,
    Mobile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionInfo {
    /// Never empty; the first entry is the cycling sort key.
    pub produces: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoTargetInfo {
    pub initial_stance: UnitStance,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorInfo {
    pub name: String,
    pub base_building: bool,
    pub production: Option<ProductionInfo>,
    pub guard: bool,
    pub auto_target: Option<AutoTargetInfo>,
    pub mobile: bool,
    pub voice: Option<String>,
}

impl ActorInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_building: false,
            production: None,
            guard: false,
            auto_target: None,
            mobile: false,
            voice: None,
        }
    }

    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::BaseBuilding => self.base_building,
            Capability::Production => self.production.is_some(),
            Capability::Guard => self.guard,
            Capability::AutoTarget => self.auto_target.is_some(),
            Capability::Mobile => self.mobile,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct RulesDatabase {
    actors: Vec<Arc<ActorInfo>>,
    actor_index_by_name: HashMap<String, usize>,
}

impl RulesDatabase {
    pub fn from_actor_infos(infos: Vec<ActorInfo>) -> Self {
        let mut actor_index_by_name = HashMap::with_capacity(infos.len());
        let actors = infos
            .into_iter()
            .enumerate()
            .map(|(idx, info)| {
                actor_index_by_name.insert(info.name.clone(), idx);
                Arc::new(info)
            })
            .collect();
        Self {
            actors,
            actor_index_by_name,
        }
    }

    pub fn actor(&self, name: &str) -> Option<&Arc<ActorInfo>> {
        self.actor_index_by_name
            .get(name)
            .and_then(|idx| self.actors.get(*idx))
    }

    pub fn actors(&self) -> &[Arc<ActorInfo>] {
        &self.actors
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulesErrorCode {
    ReadFile,
    XmlMalformed,
    InvalidRoot,
    UnknownElement,
    UnknownTrait,
    DuplicateTrait,
    MissingAttribute,
    InvalidValue,
    DuplicateActor,
}

#[derive(Debug, Clone)]
pub struct RulesError {
    pub code: RulesErrorCode,
    pub message: String,
    pub file_path: PathBuf,
    pub location: Option<SourceLocation>,
}

impl fmt::Display for RulesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(
                f,
                "{:?}: {} (file={}, line={}, column={})",
                self.code,
                self.message,
                self.file_path.display(),
                loc.line,
                loc.column
            ),
            None => write!(
                f,
                "{:?}: {} (file={})",
                self.code,
                self.message,
                self.file_path.display()
            ),
        }
    }
}

impl std::error::Error for RulesError {}

pub fn load_rules_file(path: &Path) -> Result<RulesDatabase, RulesError> {
    let raw = fs::read_to_string(path).map_err(|source| RulesError {
        code: RulesErrorCode::ReadFile,
        message: format!("failed to read rules file: {source}"),
        file_path: path.to_path_buf(),
        location: None,
    })?;
    parse_rules(path, &raw)
}

pub fn parse_rules(file_path: &Path, raw: &str) -> Result<RulesDatabase, RulesError> {
    let doc = Document::parse(raw).map_err(|error| RulesError {
        code: RulesErrorCode::XmlMalformed,
        message: format!("malformed XML: {error}"),
        file_path: file_path.to_path_buf(),
        location: Some(SourceLocation {
            line: error.pos().row as usize,
            column: error.pos().col as usize,
        }),
    })?;

    let root = doc.root_element();
    if root.tag_name().name() != "Rules" {
        return Err(error_at_node(
            RulesErrorCode::InvalidRoot,
            "root element must be <Rules>".to_string(),
            file_path,
            &doc,
            root,
        ));
    }

    let mut seen_names = HashSet::<String>::new();
    let mut infos = Vec::new();
    for child in root.children().filter(|node| node.is_element()) {
        if child.tag_name().name() != "Actor" {
            return Err(error_at_node(
                RulesErrorCode::UnknownElement,
                format!(
                    "unsupported element <{}>; expected <Actor>",
                    child.tag_name().name()
                ),
                file_path,
                &doc,
                child,
            ));
        }
        let info = parse_actor(file_path, &doc, child)?;
        if !seen_names.insert(info.name.clone()) {
            return Err(error_at_node(
                RulesErrorCode::DuplicateActor,
                format!("duplicate actor '{}'", info.name),
                file_path,
                &doc,
                child,
            ));
        }
        infos.push(info);
    }

    Ok(RulesDatabase::from_actor_infos(infos))
}

fn parse_actor(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
) -> Result<ActorInfo, RulesError> {
    let name = required_attribute(file_path, doc, node, "name")?;
    let mut info = ActorInfo::new(name);
    let mut seen_traits = HashSet::<String>::new();

    for trait_node in node.children().filter(|child| child.is_element()) {
        let trait_name = trait_node.tag_name().name().to_string();
        if !seen_traits.insert(trait_name.clone()) {
            return Err(error_at_node(
                RulesErrorCode::DuplicateTrait,
                format!("duplicate trait <{}> on actor '{}'", trait_name, info.name),
                file_path,
                doc,
                trait_node,
            ));
        }

        match trait_name.as_str() {
            "BaseBuilding" => info.base_building = true,
            "Guard" => info.guard = true,
            "Mobile" => info.mobile = true,
            "Production" => {
                let raw = required_attribute(file_path, doc, trait_node, "produces")?;
                let produces = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|entry| !entry.is_empty())
                    .map(ToString::to_string)
                    .collect::<Vec<_>>();
                if produces.is_empty() {
                    return Err(error_at_node(
                        RulesErrorCode::InvalidValue,
                        "Production produces list must name at least one queue".to_string(),
                        file_path,
                        doc,
                        trait_node,
                    ));
                }
                info.production = Some(ProductionInfo { produces });
            }
            "AutoTarget" => {
                let initial_stance = match trait_node.attribute("initialStance") {
                    None => UnitStance::default(),
                    Some(value) => UnitStance::parse(value.trim()).ok_or_else(|| {
                        error_at_node(
                            RulesErrorCode::InvalidValue,
                            format!(
                                "invalid initialStance '{}'; allowed values: HoldFire, ReturnFire, Defend, AttackAnything",
                                value
                            ),
                            file_path,
                            doc,
                            trait_node,
                        )
                    })?,
                };
                info.auto_target = Some(AutoTargetInfo { initial_stance });
            }
            "Voice" => {
                info.voice = Some(required_attribute(file_path, doc, trait_node, "name")?);
            }
            _ => {
                return Err(error_at_node(
                    RulesErrorCode::UnknownTrait,
                    format!("unknown trait <{}> on actor '{}'", trait_name, info.name),
                    file_path,
                    doc,
                    trait_node,
                ))
            }
        }
    }

    Ok(info)
}

fn required_attribute(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
    attribute: &str,
) -> Result<String, RulesError> {
    let value = node.attribute(attribute).map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(error_at_node(
            RulesErrorCode::MissingAttribute,
            format!(
                "<{}> requires a non-empty '{}' attribute",
                node.tag_name().name(),
                attribute
            ),
            file_path,
            doc,
            node,
        ));
    }
    Ok(value.to_string())
}

fn error_at_node(
    code: RulesErrorCode,
    message: String,
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
) -> RulesError {
    let pos = doc.text_pos_at(node.range().start);
    RulesError {
        code,
        message,
        file_path: file_path.to_path_buf(),
        location: Some(SourceLocation {
            line: pos.row as usize,
            column: pos.col as usize,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<RulesDatabase, RulesError> {
        parse_rules(Path::new("rules.xml"), raw)
    }

    #[test]
    fn parses_capabilities_per_actor() {
        let rules = parse(
            r#"<Rules>
                <Actor name="fact">
                    <BaseBuilding/>
                    <Production produces="Building, Defense"/>
                </Actor>
                <Actor name="e1">
                    <Mobile/>
                    <Guard/>
                    <AutoTarget initialStance="Defend"/>
                    <Voice name="GenericVoice"/>
                </Actor>
            </Rules>"#,
        )
        .expect("rules");

        assert_eq!(rules.len(), 2);
        let fact = rules.actor("fact").expect("fact");
        assert!(fact.has(Capability::BaseBuilding));
        assert!(fact.has(Capability::Production));
        assert!(!fact.has(Capability::Mobile));
        assert_eq!(
            fact.production.as_ref().expect("production").produces,
            vec!["Building".to_string(), "Defense".to_string()]
        );

        let e1 = rules.actor("e1").expect("e1");
        assert!(e1.has(Capability::Guard));
        assert!(e1.has(Capability::AutoTarget));
        assert_eq!(
            e1.auto_target.expect("auto target").initial_stance,
            UnitStance::Defend
        );
        assert_eq!(e1.voice.as_deref(), Some("GenericVoice"));
    }

    #[test]
    fn auto_target_defaults_to_attack_anything() {
        let rules = parse(r#"<Rules><Actor name="e1"><AutoTarget/></Actor></Rules>"#)
            .expect("rules");
        let info = rules.actor("e1").expect("e1");
        assert_eq!(
            info.auto_target.expect("auto target").initial_stance,
            UnitStance::AttackAnything
        );
    }

    #[test]
    fn rejects_wrong_root() {
        let error = parse("<Defs/>").expect_err("root");
        assert_eq!(error.code, RulesErrorCode::InvalidRoot);
    }

    #[test]
    fn rejects_malformed_xml_with_location() {
        let error = parse("<Rules>\n<Actor name=\"a\">\n</Rules>").expect_err("malformed");
        assert_eq!(error.code, RulesErrorCode::XmlMalformed);
        assert!(error.location.is_some());
    }

    #[test]
    fn rejects_duplicate_actor_and_trait() {
        let duplicate_actor = parse(
            r#"<Rules><Actor name="a"/><Actor name="a"/></Rules>"#,
        )
        .expect_err("duplicate actor");
        assert_eq!(duplicate_actor.code, RulesErrorCode::DuplicateActor);

        let duplicate_trait = parse(r#"<Rules><Actor name="a"><Guard/><Guard/></Actor></Rules>"#)
            .expect_err("duplicate trait");
        assert_eq!(duplicate_trait.code, RulesErrorCode::DuplicateTrait);
    }

    #[test]
    fn rejects_unknown_trait_and_bad_values() {
        let unknown = parse(r#"<Rules><Actor name="a"><Teleport/></Actor></Rules>"#)
            .expect_err("unknown trait");
        assert_eq!(unknown.code, RulesErrorCode::UnknownTrait);
        assert_eq!(
            unknown.location,
            Some(SourceLocation {
                line: 1,
                column: 24
            })
        );

        let empty_produces =
            parse(r#"<Rules><Actor name="a"><Production produces=" , "/></Actor></Rules>"#)
                .expect_err("empty produces");
        assert_eq!(empty_produces.code, RulesErrorCode::InvalidValue);

        let bad_stance =
            parse(r#"<Rules><Actor name="a"><AutoTarget initialStance="Berserk"/></Actor></Rules>"#)
                .expect_err("bad stance");
        assert_eq!(bad_stance.code, RulesErrorCode::InvalidValue);

        let missing_name = parse(r#"<Rules><Actor/></Rules>"#).expect_err("missing name");
        assert_eq!(missing_name.code, RulesErrorCode::MissingAttribute);
    }

    #[test]
    fn load_rules_file_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let error = load_rules_file(&dir.path().join("absent.xml")).expect_err("missing");
        assert_eq!(error.code, RulesErrorCode::ReadFile);
        assert!(error.location.is_none());
    }
}
