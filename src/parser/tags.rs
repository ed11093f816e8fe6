//! Recognized element names.

/// Every tag the assembler understands. Anything else is [`Tag::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Suite,
    SuiteFiles,
    SuiteFile,
    Test,
    Classes,
    Class,
    Methods,
    Include,
    Exclude,
    Packages,
    Package,
    Groups,
    Define,
    Run,
    Dependencies,
    Group,
    Listeners,
    Listener,
    Parameter,
    MethodSelectors,
    MethodSelector,
    SelectorClass,
    Script,
    Unknown,
}

impl Tag {
    pub fn from_name(name: &[u8]) -> Self {
        match name {
            b"suite" => Tag::Suite,
            b"suite-files" => Tag::SuiteFiles,
            b"suite-file" => Tag::SuiteFile,
            b"test" => Tag::Test,
            b"classes" => Tag::Classes,
            b"class" => Tag::Class,
            b"methods" => Tag::Methods,
            b"include" => Tag::Include,
            b"exclude" => Tag::Exclude,
            b"packages" => Tag::Packages,
            b"package" => Tag::Package,
            b"groups" => Tag::Groups,
            b"define" => Tag::Define,
            b"run" => Tag::Run,
            b"dependencies" => Tag::Dependencies,
            b"group" => Tag::Group,
            b"listeners" => Tag::Listeners,
            b"listener" => Tag::Listener,
            b"parameter" => Tag::Parameter,
            b"method-selectors" => Tag::MethodSelectors,
            b"method-selector" => Tag::MethodSelector,
            b"selector-class" => Tag::SelectorClass,
            b"script" => Tag::Script,
            _ => Tag::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Suite => "suite",
            Tag::SuiteFiles => "suite-files",
            Tag::SuiteFile => "suite-file",
            Tag::Test => "test",
            Tag::Classes => "classes",
            Tag::Class => "class",
            Tag::Methods => "methods",
            Tag::Include => "include",
            Tag::Exclude => "exclude",
            Tag::Packages => "packages",
            Tag::Package => "package",
            Tag::Groups => "groups",
            Tag::Define => "define",
            Tag::Run => "run",
            Tag::Dependencies => "dependencies",
            Tag::Group => "group",
            Tag::Listeners => "listeners",
            Tag::Listener => "listener",
            Tag::Parameter => "parameter",
            Tag::MethodSelectors => "method-selectors",
            Tag::MethodSelector => "method-selector",
            Tag::SelectorClass => "selector-class",
            Tag::Script => "script",
            Tag::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for tag in [Tag::Suite, Tag::SuiteFile, Tag::MethodSelectors, Tag::SelectorClass] {
            assert_eq!(Tag::from_name(tag.as_str().as_bytes()), tag);
        }
        assert_eq!(Tag::from_name(b"suite-x"), Tag::Unknown);
    }
}
