/// MCP server implementation for the web standards dataset.
///
/// Exposes nine read-only tools over specifications, WebIDL, CSS and HTML element data.
/// Every tool validates its arguments first; failures come back as a serialized
/// `ToolErrorPayload`.
use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use tracing::debug;

use crate::cache::DatasetCache;
use crate::css;
use crate::elements;
use crate::error::AppError;
use crate::listing::{self, SpecFilter};
use crate::model::Dataset;
use crate::pwa;
use crate::resolver::{self, MAX_SUGGESTIONS};
use crate::search::SearchEngine;
use crate::validate::{LIST_LIMIT, SEARCH_LIMIT, Validator};
use crate::webidl;
use mcp_common::mcp_api::{
    CssEntriesResponse, CssFeatureKind, CssFeaturesParams, CssPropertiesParams,
    HtmlElementsParams, HtmlElementsResponse, ListSpecsParams, ListSpecsResponse,
    PwaSpecsParams, PwaSpecsResponse, SearchSpecsParams, SearchSpecsResponse, ShortnameParams,
    SpecDependenciesResponse, SpecDetailResponse, WebIdlResponse,
};

#[derive(Clone)]
pub struct WebStandardsServer {
    cache: Arc<DatasetCache>,
    search_engine: Arc<SearchEngine>,
    tool_router: ToolRouter<WebStandardsServer>,
}

impl WebStandardsServer {
    pub fn new(cache: Arc<DatasetCache>) -> Self {
        let search_engine = Arc::new(SearchEngine::new(Arc::clone(&cache)));
        Self {
            cache,
            search_engine,
            tool_router: Self::tool_router(),
        }
    }

    async fn list_specs_inner(&self, params: ListSpecsParams) -> Result<ListSpecsResponse, AppError> {
        let mut v = Validator::default();
        let filter = SpecFilter {
            organization: v.optional("organization", params.organization.as_deref()),
            category: v.optional("category", params.category.as_deref()),
            keyword: v.optional("keyword", params.keyword.as_deref()),
        };
        let limit = v.limit("limit", params.limit, LIST_LIMIT);
        v.finish()?;

        let index = self.cache.specifications().await?;
        let (total, specs) = listing::list_specs(&index, &filter, limit);
        Ok(ListSpecsResponse { total, specs })
    }

    async fn search_specs_inner(
        &self,
        params: SearchSpecsParams,
    ) -> Result<SearchSpecsResponse, AppError> {
        let mut v = Validator::default();
        let query = v.required("query", &params.query);
        let limit = v.limit("limit", params.limit, SEARCH_LIMIT);
        v.finish()?;

        let results = self.search_engine.search(&query, limit).await?;
        Ok(SearchSpecsResponse { results })
    }

    async fn get_spec_inner(&self, params: ShortnameParams) -> Result<SpecDetailResponse, AppError> {
        let mut v = Validator::default();
        let shortname = v.required("shortname", &params.shortname);
        v.finish()?;

        let index = self.cache.specifications().await?;
        let spec = resolver::resolve_or_suggest(&index, &shortname)?;
        let idl = self.cache.webidl().await?;

        Ok(SpecDetailResponse {
            spec: spec.summary(),
            abstract_text: spec.abstract_text.clone(),
            series: spec.series_shortname().map(str::to_string),
            has_webidl: webidl::has_webidl(&idl, &spec.shortname, spec.series_shortname()),
            webidl_degraded: idl.degraded,
        })
    }

    async fn get_webidl_inner(&self, params: ShortnameParams) -> Result<WebIdlResponse, AppError> {
        let mut v = Validator::default();
        let shortname = v.required("shortname", &params.shortname);
        v.finish()?;

        let idl = self.cache.webidl().await?;
        if idl.degraded {
            return Err(AppError::Unavailable {
                dataset: Dataset::WebIdl,
            });
        }
        let (key, text) = webidl::lookup_webidl(&idl, &shortname)?;
        debug!(requested = %shortname, resolved = key, "webidl lookup");
        Ok(WebIdlResponse {
            shortname: key.to_string(),
            idl: text.to_string(),
        })
    }

    async fn css_inner(
        &self,
        kind: CssFeatureKind,
        spec: Option<&str>,
        name: Option<&str>,
    ) -> Result<CssEntriesResponse, AppError> {
        let mut v = Validator::default();
        let spec = v.optional("spec", spec);
        let name = v.optional("property", name);
        v.finish()?;

        let table = self.cache.css().await?;
        let entries = css::css_entries(&table, kind, spec.as_deref(), name.as_deref());

        // A degraded table is empty; report that instead of a miss.
        if entries.is_empty() && !table.degraded {
            if let Some(name) = &name {
                return Err(AppError::not_found(
                    "CSS property",
                    name,
                    css::suggest_names(&table, kind, name, MAX_SUGGESTIONS),
                ));
            }
            if let Some(spec) = &spec {
                // Spec ids sharing the leading segment ("css" for "css-colour").
                let stem = spec.split('-').next().unwrap_or_default().to_lowercase();
                let suggestions = css::spec_ids(&table, kind)
                    .into_iter()
                    .filter(|id| !stem.is_empty() && id.contains(&stem))
                    .take(MAX_SUGGESTIONS)
                    .collect();
                return Err(AppError::not_found("CSS spec", spec, suggestions));
            }
        }

        Ok(CssEntriesResponse {
            kind,
            count: entries.len(),
            entries,
            degraded: table.degraded,
        })
    }

    async fn get_html_elements_inner(
        &self,
        params: HtmlElementsParams,
    ) -> Result<HtmlElementsResponse, AppError> {
        let mut v = Validator::default();
        let spec = v.optional("spec", params.spec.as_deref());
        let element = v.optional("element", params.element.as_deref());
        v.finish()?;

        let table = self.cache.elements().await?;
        if table.degraded {
            return Ok(HtmlElementsResponse {
                count: 0,
                elements: Vec::new(),
                degraded: true,
            });
        }
        let elements = elements::html_elements(&table, spec.as_deref(), element.as_deref())?;
        Ok(HtmlElementsResponse {
            count: elements.len(),
            elements,
            degraded: false,
        })
    }

    async fn get_pwa_specs_inner(&self, params: PwaSpecsParams) -> Result<PwaSpecsResponse, AppError> {
        let index = self.cache.specifications().await?;
        let specs = pwa::pwa_specs(&index, params.core_only.unwrap_or(false));
        Ok(PwaSpecsResponse {
            count: specs.len(),
            specs,
        })
    }

    async fn get_spec_dependencies_inner(
        &self,
        params: ShortnameParams,
    ) -> Result<SpecDependenciesResponse, AppError> {
        let mut v = Validator::default();
        let shortname = v.required("shortname", &params.shortname);
        v.finish()?;

        let index = self.cache.specifications().await?;
        let spec = resolver::resolve_or_suggest(&index, &shortname)?;
        Ok(SpecDependenciesResponse {
            shortname: spec.shortname.clone(),
            dependencies: Vec::new(),
            dependents: Vec::new(),
        })
    }
}

#[tool_router]
impl WebStandardsServer {
    #[tool(description = "List web specifications, optionally filtered by organization (e.g. 'W3C', 'WHATWG'), category (e.g. 'browser') or keyword.")]
    async fn list_specs(
        &self,
        Parameters(params): Parameters<ListSpecsParams>,
    ) -> Result<Json<ListSpecsResponse>, String> {
        self.list_specs_inner(params)
            .await
            .map(Json)
            .map_err(AppError::into_tool_error)
    }

    #[tool(description = "Search web specifications by shortname, title and abstract. Returns results ranked by relevance.")]
    async fn search_specs(
        &self,
        Parameters(params): Parameters<SearchSpecsParams>,
    ) -> Result<Json<SearchSpecsResponse>, String> {
        self.search_specs_inner(params)
            .await
            .map(Json)
            .map_err(AppError::into_tool_error)
    }

    #[tool(description = "Get details of a specification by shortname or series name (e.g. 'fetch', 'service-workers').")]
    async fn get_spec(
        &self,
        Parameters(params): Parameters<ShortnameParams>,
    ) -> Result<Json<SpecDetailResponse>, String> {
        self.get_spec_inner(params)
            .await
            .map(Json)
            .map_err(AppError::into_tool_error)
    }

    #[tool(description = "Get the WebIDL interface definitions of a specification (e.g. 'fetch', 'dom').")]
    async fn get_webidl(
        &self,
        Parameters(params): Parameters<ShortnameParams>,
    ) -> Result<Json<WebIdlResponse>, String> {
        self.get_webidl_inner(params)
            .await
            .map(Json)
            .map_err(AppError::into_tool_error)
    }

    #[tool(description = "List CSS properties with syntax, initial value and inheritance. Filter by spec (e.g. 'css-flexbox') or look up one property by name.")]
    async fn get_css_properties(
        &self,
        Parameters(params): Parameters<CssPropertiesParams>,
    ) -> Result<Json<CssEntriesResponse>, String> {
        self.css_inner(
            CssFeatureKind::Properties,
            params.spec.as_deref(),
            params.property.as_deref(),
        )
        .await
        .map(Json)
        .map_err(AppError::into_tool_error)
    }

    #[tool(description = "List CSS at-rules, selectors, value types or properties, optionally filtered by spec (e.g. 'css-color').")]
    async fn get_css_features(
        &self,
        Parameters(params): Parameters<CssFeaturesParams>,
    ) -> Result<Json<CssEntriesResponse>, String> {
        self.css_inner(params.kind, params.spec.as_deref(), None)
            .await
            .map(Json)
            .map_err(AppError::into_tool_error)
    }

    #[tool(description = "List HTML/SVG/MathML elements with their DOM interfaces. Filter by exact spec shortname (e.g. 'html') or search by element name (e.g. 'video' or '<video>').")]
    async fn get_html_elements(
        &self,
        Parameters(params): Parameters<HtmlElementsParams>,
    ) -> Result<Json<HtmlElementsResponse>, String> {
        self.get_html_elements_inner(params)
            .await
            .map(Json)
            .map_err(AppError::into_tool_error)
    }

    #[tool(description = "List specifications relevant to Progressive Web Apps. Set core_only for service workers, manifest, push and notifications only.")]
    async fn get_pwa_specs(
        &self,
        Parameters(params): Parameters<PwaSpecsParams>,
    ) -> Result<Json<PwaSpecsResponse>, String> {
        self.get_pwa_specs_inner(params)
            .await
            .map(Json)
            .map_err(AppError::into_tool_error)
    }

    #[tool(description = "Get the dependencies of a specification. Dependency data is not computed; the lists are currently always empty.")]
    async fn get_spec_dependencies(
        &self,
        Parameters(params): Parameters<ShortnameParams>,
    ) -> Result<Json<SpecDependenciesResponse>, String> {
        self.get_spec_dependencies_inner(params)
            .await
            .map(Json)
            .map_err(AppError::into_tool_error)
    }
}

#[tool_handler]
impl ServerHandler for WebStandardsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "web-standards".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Web standards MCP server. Provides lookup and search over bundled web \
                 specification metadata. Use search_specs for free-text queries, get_spec for a \
                 known shortname, get_webidl for interface definitions, get_css_properties and \
                 get_css_features for CSS tables, get_html_elements for element tables and \
                 get_pwa_specs for Progressive Web App specifications."
                    .to_string(),
            ),
        }
    }
}
