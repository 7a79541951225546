use reqwest::Url;
use serde::{de::Visitor, Deserialize, Deserializer};

/// Root url of the API, e.g. `https://abc.execute-api.us-east-1.amazonaws.com/`.
#[derive(Debug, Clone)]
pub struct ApplicationBaseUrl(Url);

impl AsRef<Url> for ApplicationBaseUrl {
    fn as_ref(&self) -> &Url {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ApplicationBaseUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ApplicationBaseUrlVisitor;

        impl<'de> Visitor<'de> for ApplicationBaseUrlVisitor {
            type Value = ApplicationBaseUrl;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a valid base url string")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                ApplicationBaseUrl::parse(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(ApplicationBaseUrlVisitor)
    }
}

impl ApplicationBaseUrl {
    /// Accepts a url with an optional stage prefix (`/prod`); a trailing slash is added
    /// so that relative joins land under the prefix.
    pub fn parse(url: &str) -> Result<Self, String> {
        let mut url = Url::parse(url).map_err(|e| e.to_string())?;
        if url.cannot_be_a_base() {
            return Err(format!("expected base url. found: {url}"));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(format!("base url must not carry a query or fragment. found: {url}"));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self(url))
    }

    pub fn join(&self, path: &str) -> Result<Url, String> {
        self.0
            .join(path.trim_start_matches('/'))
            .map_err(|e| e.to_string())
    }
}
