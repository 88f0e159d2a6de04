// Request descriptors and URL assembly
use url::form_urlencoded;

// Remote routes, relative to the base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    AuthorShow,
    AuthorBooks,
    AuthorSearch,
    BookByIsbn,
    SearchBooks,
    GroupList(u64),
    GroupMembers(u64),
    FindGroup,
    GroupShow(u64),
    ReviewShow,
    ReviewByUserAndBook,
    SeriesByAuthor(u64),
    UserShow,
}

impl Route {
    pub fn template(&self) -> &'static str {
        match self {
            Route::AuthorShow => "author/show/",
            Route::AuthorBooks => "author/list/",
            Route::AuthorSearch => "api/author_url/",
            Route::BookByIsbn => "book/isbn/",
            Route::SearchBooks => "search/index.xml",
            Route::GroupList(_) => "group/list/{id}.xml",
            Route::GroupMembers(_) => "group/members/{id}.xml",
            Route::FindGroup => "group/search.xml",
            Route::GroupShow(_) => "group/show/{id}.xml",
            Route::ReviewShow => "review/show.xml",
            Route::ReviewByUserAndBook => "review/show_by_user_and_book.xml",
            Route::SeriesByAuthor(_) => "series/list/{id}.xml",
            Route::UserShow => "user/show/",
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::GroupList(id)
            | Route::GroupMembers(id)
            | Route::GroupShow(id)
            | Route::SeriesByAuthor(id) => self.template().replace("{id}", &id.to_string()),
            _ => self.template().to_string(),
        }
    }
}

// Where the fixed `?format=xml&key=...` block goes relative to the caller's
// query string. Both shapes are what the remote service has always received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendMode {
    /// path + fixed block + `&` + query
    Append,
    /// path + query + fixed block
    Merge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Params {
    /// Encoded directly onto the path, with no `name=` prefix.
    Scalar(String),
    /// Ordered pairs, serialized as a form query string.
    Map(Vec<(String, String)>),
}

impl Default for Params {
    fn default() -> Self {
        Params::Map(Vec::new())
    }
}

impl Params {
    pub fn scalar(value: impl ToString) -> Self {
        Params::Scalar(value.to_string())
    }

    pub fn map() -> Self {
        Params::default()
    }

    /// Sets `key`, replacing an existing value in place. A scalar is turned
    /// into an empty map first.
    pub fn with(self, key: impl Into<String>, value: impl ToString) -> Self {
        let mut pairs = match self {
            Params::Map(pairs) => pairs,
            Params::Scalar(_) => Vec::new(),
        };
        let key = key.into();
        let value = value.to_string();

        match pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => pairs.push((key, value)),
        }

        Params::Map(pairs)
    }

    pub fn with_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    /// Adds a nested entry, flattened as `outer[inner]=value`.
    pub fn with_nested(self, outer: &str, inner: &str, value: impl ToString) -> Self {
        self.with(format!("{}[{}]", outer, inner), value)
    }

    /// Merges `other` into `self`: later values win for repeated keys, new
    /// keys are appended in order.
    pub fn merge(self, other: Params) -> Self {
        match other {
            Params::Map(pairs) => pairs
                .into_iter()
                .fold(self, |params, (key, value)| params.with(key, value)),
            Params::Scalar(_) => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Params::Scalar(value) => value.is_empty(),
            Params::Map(pairs) => pairs.is_empty(),
        }
    }

    pub fn to_query(&self) -> String {
        let query: String = match self {
            Params::Scalar(value) => form_urlencoded::byte_serialize(value.as_bytes()).collect(),
            Params::Map(pairs) if pairs.is_empty() => String::new(),
            Params::Map(pairs) => form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs.iter())
                .finish(),
        };
        // form encoding leaves `*` bare; the service has always received `%2A`
        query.replace('*', "%2A")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub route: Route,
    pub params: Params,
    pub mode: AppendMode,
}

impl Request {
    pub fn new(route: Route, params: Params, mode: AppendMode) -> Self {
        Self {
            route,
            params,
            mode,
        }
    }

    pub fn url(&self, base_url: &str, api_key: &str) -> String {
        build_url(base_url, api_key, self.route, &self.params, self.mode)
    }
}

pub fn build_url(
    base_url: &str,
    api_key: &str,
    route: Route,
    params: &Params,
    mode: AppendMode,
) -> String {
    let query = params.to_query();
    let fixed = format!("?format=xml&key={}", api_key);
    let path = route.path();

    match mode {
        AppendMode::Append => format!("{}{}{}&{}", base_url, path, fixed, query),
        AppendMode::Merge => format!("{}{}{}{}", base_url, path, query, fixed),
    }
}
