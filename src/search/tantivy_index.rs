use crate::search::{BlogIndex, IndexedBlog};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tantivy::collector::TopDocs;
use tantivy::directory::MmapDirectory;
use tantivy::query::{BooleanQuery, BoostQuery, FuzzyTermQuery, Occur, Query, TermQuery};
use tantivy::schema::{Field, IndexRecordOption, Schema, Value, STORED, STRING, TEXT};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};

const WRITER_HEAP_BYTES: usize = 50_000_000;
const TITLE_BOOST: f32 = 2.0;
const PUBLISHED: &str = "true";
const DRAFT: &str = "false";

/// Tantivy index of blog posts. Every query token is matched as a prefix so
/// partially typed words already find posts.
#[derive(Clone)]
pub struct TantivyIndex {
    reader: IndexReader,
    writer: Arc<Mutex<IndexWriter>>,
    slug_field: Field,
    title_field: Field,
    subtitle_field: Field,
    description_field: Field,
    published_field: Field,
}

impl TantivyIndex {
    /// In-memory index, rebuilt on every start.
    pub fn new() -> Result<Self> {
        Self::with_path(None)
    }

    pub fn with_path(path: Option<PathBuf>) -> Result<Self> {
        let schema = Self::create_schema();
        let index = match path {
            Some(path) => {
                std::fs::create_dir_all(&path)?;
                let directory = MmapDirectory::open(&path)?;
                Index::open_or_create(directory, schema)?
            }
            None => Index::create_in_ram(schema),
        };

        let schema = index.schema();
        let writer: IndexWriter = index.writer(WRITER_HEAP_BYTES)?;
        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        Ok(Self {
            reader,
            writer: Arc::new(Mutex::new(writer)),
            slug_field: schema.get_field("slug")?,
            title_field: schema.get_field("title")?,
            subtitle_field: schema.get_field("subtitle")?,
            description_field: schema.get_field("description")?,
            published_field: schema.get_field("published")?,
        })
    }

    fn create_schema() -> Schema {
        let mut builder = Schema::builder();
        builder.add_text_field("slug", STRING | STORED);
        builder.add_text_field("title", TEXT);
        builder.add_text_field("subtitle", TEXT);
        builder.add_text_field("description", TEXT);
        builder.add_text_field("published", STRING);
        builder.build()
    }

    fn write<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut IndexWriter) -> Result<()>,
    {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| anyhow!("index writer lock poisoned"))?;
        change(&mut writer)?;
        writer.commit()?;
        drop(writer);
        self.reader.reload()?;
        Ok(())
    }

    fn token_query(&self, token: &str) -> Box<dyn Query> {
        let fields = [
            (self.title_field, TITLE_BOOST),
            (self.subtitle_field, 1.0),
            (self.description_field, 1.0),
        ];
        let per_field = fields
            .into_iter()
            .map(|(field, boost)| {
                let prefix = FuzzyTermQuery::new_prefix(Term::from_field_text(field, token), 0, true);
                let query: Box<dyn Query> = Box::new(BoostQuery::new(Box::new(prefix), boost));
                (Occur::Should, query)
            })
            .collect();
        Box::new(BooleanQuery::new(per_field))
    }
}

/// Splits the way tantivy's default tokenizer does: alphanumeric runs, lowercased.
fn tokenize(query: &str) -> Vec<String> {
    query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[async_trait]
impl BlogIndex for TantivyIndex {
    async fn upsert(&self, blog: IndexedBlog) -> Result<()> {
        self.write(|writer| {
            writer.delete_term(Term::from_field_text(self.slug_field, &blog.slug));
            writer.add_document(doc!(
                self.slug_field => blog.slug.as_str(),
                self.title_field => blog.title.as_str(),
                self.subtitle_field => blog.subtitle.as_str(),
                self.description_field => blog.description.as_str(),
                self.published_field => if blog.is_published { PUBLISHED } else { DRAFT }
            ))?;
            Ok(())
        })
    }

    async fn remove(&self, slug: &str) -> Result<()> {
        self.write(|writer| {
            writer.delete_term(Term::from_field_text(self.slug_field, slug));
            Ok(())
        })
    }

    async fn clear(&self) -> Result<()> {
        self.write(|writer| {
            writer.delete_all_documents()?;
            Ok(())
        })
    }

    async fn search(
        &self,
        query: &str,
        published_only: bool,
        limit: usize,
    ) -> Result<Vec<(String, f32)>> {
        let tokens = tokenize(query);
        if tokens.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let mut clauses: Vec<(Occur, Box<dyn Query>)> = tokens
            .iter()
            .map(|token| (Occur::Must, self.token_query(token)))
            .collect();
        if published_only {
            let published = TermQuery::new(
                Term::from_field_text(self.published_field, PUBLISHED),
                IndexRecordOption::Basic,
            );
            clauses.push((Occur::Must, Box::new(published)));
        }
        let query = BooleanQuery::new(clauses);

        let searcher = self.reader.searcher();
        let top_docs = searcher.search(&query, &TopDocs::with_limit(limit))?;

        let mut results = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let doc: TantivyDocument = searcher.doc(address)?;
            if let Some(slug) = doc.get_first(self.slug_field).and_then(|v| v.as_str()) {
                results.push((slug.to_string(), score));
            }
        }
        Ok(results)
    }
}
