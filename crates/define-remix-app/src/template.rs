// Source templates for newly created pages

use crate::route::matcher::SPLAT_PARAM;
use crate::RoutePathSegment;

/// PascalCase component name from the static parts of a route path
///
/// `Index` for the home route, `Page` when nothing static is left.
pub(crate) fn component_name(path: &[RoutePathSegment]) -> String {
    if path.is_empty() {
        return "Index".to_string();
    }

    let name: String = path
        .iter()
        .filter_map(|segment| match segment {
            RoutePathSegment::Static { text } => Some(text.as_str()),
            RoutePathSegment::Dynamic { .. } => None,
        })
        .flat_map(|text| text.split(|c: char| !c.is_ascii_alphanumeric()))
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect();

    match name.chars().next() {
        None => "Page".to_string(),
        Some(first) if first.is_ascii_digit() => format!("Page{}", name),
        Some(_) => name,
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Names of the params a page receives, splat as `*`
pub(crate) fn param_names(path: &[RoutePathSegment]) -> Vec<String> {
    path.iter()
        .filter_map(|segment| match segment {
            RoutePathSegment::Dynamic {
                is_catch_all: true, ..
            } => Some(SPLAT_PARAM.to_string()),
            RoutePathSegment::Dynamic { name, .. } => Some(name.clone()),
            RoutePathSegment::Static { .. } => None,
        })
        .collect()
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// `key: params.key` line of the generated loader
fn loader_entry(name: &str) -> String {
    if name == SPLAT_PARAM {
        "        splat: params['*'],".to_string()
    } else if is_identifier(name) {
        format!("        {name}: params.{name},")
    } else {
        format!("        '{name}': params['{name}'],")
    }
}

/// Source of a new page module
pub(crate) fn page_source(component: &str, params: &[String]) -> String {
    if params.is_empty() {
        return format!(
            "export default function {component}() {{\n    return <div>{component}</div>;\n}}\n"
        );
    }

    let entries: Vec<String> = params.iter().map(|name| loader_entry(name)).collect();
    format!(
        "import type {{ LoaderFunctionArgs }} from '@remix-run/node';\n\
         import {{ useLoaderData }} from '@remix-run/react';\n\
         \n\
         export const loader = async ({{ params }}: LoaderFunctionArgs) => {{\n    \
             return {{\n{entries}\n    }};\n\
         }};\n\
         \n\
         export default function {component}() {{\n    \
             const params = useLoaderData<typeof loader>();\n    \
             return <div>{component} {{JSON.stringify(params)}}</div>;\n\
         }}\n",
        entries = entries.join("\n"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_component_names() {
        assert_eq!(component_name(&[]), "Index");
        assert_eq!(
            component_name(&[
                RoutePathSegment::static_text("about"),
                RoutePathSegment::static_text("our-team"),
            ]),
            "AboutOurTeam"
        );
        assert_eq!(component_name(&[RoutePathSegment::dynamic("id")]), "Page");
        assert_eq!(component_name(&[RoutePathSegment::static_text("404")]), "Page404");
    }

    #[test]
    fn test_static_page_source() {
        assert_eq!(
            page_source("About", &[]),
            "export default function About() {\n    return <div>About</div>;\n}\n"
        );
    }

    #[test]
    fn test_loader_page_source() {
        let source = page_source("Docs", &["lang".to_string(), "*".to_string()]);
        assert!(source.starts_with("import type { LoaderFunctionArgs } from '@remix-run/node';\n"));
        assert!(source.contains("export const loader = async ({ params }: LoaderFunctionArgs) => {\n    return {\n"));
        assert!(source.contains("        lang: params.lang,\n        splat: params['*'],\n    };\n};\n"));
        assert!(source.contains("    const params = useLoaderData<typeof loader>();\n"));
    }

    #[test]
    fn test_param_names() {
        let path = vec![
            RoutePathSegment::static_text("docs"),
            RoutePathSegment::optional("lang"),
            RoutePathSegment::catch_all(),
        ];
        assert_eq!(param_names(&path), vec!["lang", "*"]);
    }
}
