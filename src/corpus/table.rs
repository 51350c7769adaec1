use super::article::Article;
use super::article::ArticleId;
use super::article::Split;
use crate::worddist::GlobalDist;
use std::collections::HashMap;

/// Capitalize the first letter, leaving the rest of the string alone.
/// Article names are case-sensitive except for the leading letter.
pub fn capfirst(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().chain(chars).collect(),
    }
}

/// Short form of an article name. "Tucson, Arizona" shortens to
/// "tucson" with division "arizona"; "Mercury (planet)" shortens to
/// "mercury" with no division; anything else is its own short form.
/// The short form is the name a toponym would use to refer to the
/// article.
pub fn short_form(name: &str) -> (String, Option<String>) {
    if let Some(at) = name.find(", ") {
        (name[..at].to_owned(), Some(name[at + 2..].to_owned()))
    } else if let Some(at) = name.rfind(" (") {
        if name.ends_with(')') {
            (name[..at].to_owned(), None)
        } else {
            (name.to_owned(), None)
        }
    } else {
        (name.to_owned(), None)
    }
}

/// The arena of all articles, with the name indices used for lookup
/// and for gazetteer matching. Redirect records are never stored here;
/// a redirect's title is recorded as one more name of its target.
#[derive(Debug, Default)]
pub struct ArticleTable {
    articles: Vec<Article>,
    by_name: HashMap<String, ArticleId>,
    lower_name: HashMap<String, Vec<ArticleId>>,
    short_lower_name: HashMap<String, Vec<ArticleId>>,
    lower_name_div: HashMap<(String, String), Vec<ArticleId>>,
    lower_toponym: HashMap<String, Vec<ArticleId>>,
    by_split: HashMap<Split, Vec<ArticleId>>,
}

impl ArticleTable {
    /// Add an article to the arena and record its own title.
    pub fn insert(&mut self, article: Article) -> ArticleId {
        let id = ArticleId(self.articles.len() as u32);
        let title = capfirst(&article.title);
        self.articles.push(article);
        self.articles[id.0 as usize].title = title.clone();
        self.record(&title, id, false);
        id
    }

    /// Record one of an article's names, along with its lowercased
    /// alias, short form, and (short, division) compound key. Redirect
    /// names map to the target article but never join a split.
    pub fn record(&mut self, name: &str, id: ArticleId, is_redirect: bool) {
        let name = capfirst(name);
        let loname = name.to_lowercase();
        self.by_name.insert(name, id);
        self.lower_name.entry(loname.clone()).or_default().push(id);
        let (short, div) = short_form(&loname);
        if let Some(div) = div {
            self.lower_name_div
                .entry((short.clone(), div))
                .or_default()
                .push(id);
        }
        self.short_lower_name
            .entry(short.clone())
            .or_default()
            .push(id);
        let toponyms = self.lower_toponym.entry(loname.clone()).or_default();
        if !toponyms.contains(&id) {
            toponyms.push(id);
        }
        if short != loname {
            let toponyms = self.lower_toponym.entry(short).or_default();
            if !toponyms.contains(&id) {
                toponyms.push(id);
            }
        }
        if !is_redirect {
            let split = self.articles[id.0 as usize].split;
            self.by_split.entry(split).or_default().push(id);
        }
    }

    /// Case-sensitive lookup, except the first letter is capitalized
    /// the way names are stored.
    pub fn lookup(&self, name: &str) -> Option<ArticleId> {
        assert!(!name.is_empty());
        self.by_name.get(&capfirst(name)).copied()
    }

    pub fn article(&self, id: ArticleId) -> &Article {
        &self.articles[id.0 as usize]
    }

    pub fn article_mut(&mut self, id: ArticleId) -> &mut Article {
        &mut self.articles[id.0 as usize]
    }

    pub fn by_split(&self, split: Split) -> &[ArticleId] {
        self.by_split.get(&split).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn by_lower_name(&self, loname: &str) -> &[ArticleId] {
        self.lower_name.get(loname).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn by_short_lower_name(&self, short: &str) -> &[ArticleId] {
        self.short_lower_name
            .get(short)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn by_lower_name_div(&self, short: &str, div: &str) -> &[ArticleId] {
        self.lower_name_div
            .get(&(short.to_owned(), div.to_owned()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn by_lower_toponym(&self, toponym: &str) -> &[ArticleId] {
        self.lower_toponym
            .get(toponym)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn ids(&self) -> impl Iterator<Item = ArticleId> + '_ {
        (0..self.articles.len()).map(|i| ArticleId(i as u32))
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Finish every article distribution against the global estimate.
    pub fn finish_distributions(&mut self, global: &GlobalDist) {
        let mut finished = 0;
        for article in self.articles.iter_mut() {
            if let Some(dist) = article.dist.as_mut() {
                if !dist.finished() {
                    dist.finish(global);
                    finished += 1;
                }
            }
        }
        log::info!(
            "{:<32}{:<32}",
            "finished distributions",
            format!("{} of {} articles", finished, self.articles.len())
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, split: Split) -> Article {
        let mut art = Article::new(0, title.to_owned());
        art.split = split;
        art
    }

    #[test]
    fn short_forms() {
        assert_eq!(
            short_form("tucson, arizona"),
            ("tucson".to_owned(), Some("arizona".to_owned()))
        );
        assert_eq!(short_form("mercury (planet)"), ("mercury".to_owned(), None));
        assert_eq!(short_form("london"), ("london".to_owned(), None));
        assert_eq!(
            short_form("springfield, clark county, ohio"),
            (
                "springfield".to_owned(),
                Some("clark county, ohio".to_owned())
            )
        );
    }

    #[test]
    fn lookup_capitalizes_first_letter() {
        let mut table = ArticleTable::default();
        let id = table.insert(article("paris", Split::Training));
        assert_eq!(table.lookup("paris"), Some(id));
        assert_eq!(table.lookup("Paris"), Some(id));
        assert_eq!(table.article(id).title, "Paris");
        assert_eq!(table.lookup("PARIS"), None);
    }

    #[test]
    fn redirect_names_share_the_record() {
        let mut table = ArticleTable::default();
        let id = table.insert(article("New York City", Split::Training));
        table.record("NYC", id, true);
        assert_eq!(table.lookup("NYC"), Some(id));
        assert_eq!(table.by_split(Split::Training), &[id]);
        assert_eq!(table.by_lower_toponym("nyc"), &[id]);
    }

    #[test]
    fn compound_names_index_by_division() {
        let mut table = ArticleTable::default();
        let id = table.insert(article("Springfield, Ohio", Split::Dev));
        assert_eq!(table.by_lower_name_div("springfield", "ohio"), &[id]);
        assert_eq!(table.by_short_lower_name("springfield"), &[id]);
        assert_eq!(table.by_lower_toponym("springfield"), &[id]);
        assert_eq!(table.by_lower_toponym("springfield, ohio"), &[id]);
    }

    #[test]
    fn splits_enumerate_in_insertion_order() {
        let mut table = ArticleTable::default();
        let a = table.insert(article("Alpha", Split::Dev));
        let b = table.insert(article("Beta", Split::Dev));
        let c = table.insert(article("Gamma", Split::Training));
        assert_eq!(table.by_split(Split::Dev), &[a, b]);
        assert_eq!(table.by_split(Split::Training), &[c]);
        assert_eq!(table.by_split(Split::Test), &[] as &[ArticleId]);
    }
}
