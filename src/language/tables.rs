// Built-in vocabulary tables.

pub(super) const EN_CONTRACTIONS: &[(&str, &str)] = &[
    ("don't", "do not"),
    ("doesn't", "does not"),
    ("didn't", "did not"),
    ("can't", "cannot"),
    ("couldn't", "could not"),
    ("won't", "will not"),
    ("wouldn't", "would not"),
    ("shouldn't", "should not"),
    ("isn't", "is not"),
    ("aren't", "are not"),
    ("wasn't", "was not"),
    ("weren't", "were not"),
    ("haven't", "have not"),
    ("hasn't", "has not"),
    ("hadn't", "had not"),
    ("it's", "it is"),
    ("that's", "that is"),
    ("there's", "there is"),
    ("what's", "what is"),
    ("let's", "let us"),
    ("i'm", "i am"),
    ("i've", "i have"),
    ("i'll", "i will"),
    ("i'd", "i would"),
    ("you're", "you are"),
    ("you've", "you have"),
    ("we're", "we are"),
    ("we've", "we have"),
    ("we'll", "we will"),
    ("they're", "they are"),
    ("they've", "they have"),
    ("they'll", "they will"),
    ("he's", "he is"),
    ("she's", "she is"),
];

pub(super) const EN_SYNONYMS: &[&[&str]] = &[
    &["big", "large", "huge", "enormous", "massive"],
    &["small", "little", "tiny", "minor"],
    &["fast", "quick", "rapid", "swift"],
    &["slow", "gradual", "sluggish"],
    &["increase", "rise", "grow", "growth", "expand"],
    &["decrease", "decline", "drop", "fall", "reduce", "reduction"],
    &["important", "significant", "key", "crucial", "essential"],
    &["problem", "issue", "challenge", "difficulty"],
    &["result", "outcome", "consequence", "effect"],
    &["cause", "reason", "origin", "source"],
    &["method", "approach", "technique", "process"],
    &["show", "demonstrate", "indicate", "reveal"],
    &["use", "utilize", "employ", "apply"],
    &["begin", "start", "commence", "initiate"],
    &["end", "finish", "conclude", "complete"],
    &["help", "assist", "support", "aid"],
    &["study", "research", "investigation", "analysis"],
    &["data", "information", "evidence", "figures"],
    &["company", "business", "firm", "organization"],
    &["money", "funds", "capital", "budget"],
    &["people", "population", "citizens", "residents"],
    &["country", "nation", "state"],
    &["planet", "world", "globe"],
    &["moon", "satellite"],
    &["sky", "atmosphere", "heavens"],
    &["city", "town", "municipality"],
    &["improve", "enhance", "better", "upgrade"],
    &["create", "make", "build", "produce"],
    &["explain", "describe", "clarify"],
    &["goal", "objective", "aim", "target"],
];

pub(super) const EN_STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "of", "to", "in", "on", "at", "by", "for",
    "with", "from", "as", "is", "are", "was", "were", "be", "been", "being", "it", "its",
    "this", "that", "these", "those", "has", "have", "had", "do", "does", "did", "not", "so",
    "than", "then", "there", "their", "they", "we", "you", "he", "she", "i", "our", "your",
    "his", "her", "which", "who", "what", "when", "where", "how", "also", "very", "into",
];

pub(super) const ES_CONTRACTIONS: &[(&str, &str)] = &[("al", "a el"), ("del", "de el")];

pub(super) const ES_SYNONYMS: &[&[&str]] = &[
    &["grande", "enorme", "amplio", "extenso"],
    &["pequeño", "chico", "diminuto", "reducido"],
    &["rápido", "veloz", "ágil"],
    &["aumentar", "aumento", "crecer", "crecimiento", "incrementar"],
    &["disminuir", "disminución", "reducir", "reducción", "bajar"],
    &["importante", "significativo", "clave", "esencial", "fundamental"],
    &["problema", "dificultad", "desafío", "inconveniente"],
    &["resultado", "consecuencia", "efecto"],
    &["causa", "razón", "motivo", "origen"],
    &["método", "enfoque", "técnica", "proceso"],
    &["mostrar", "demostrar", "indicar", "revelar"],
    &["usar", "utilizar", "emplear", "aplicar"],
    &["empezar", "comenzar", "iniciar"],
    &["terminar", "finalizar", "concluir"],
    &["ayudar", "apoyar", "asistir"],
    &["estudio", "investigación", "análisis"],
    &["datos", "información", "evidencia"],
    &["empresa", "compañía", "negocio", "organización"],
    &["dinero", "fondos", "capital", "presupuesto"],
    &["gente", "población", "ciudadanos", "habitantes"],
    &["país", "nación", "estado"],
    &["planeta", "mundo"],
    &["luna", "satélite"],
    &["cielo", "atmósfera", "firmamento"],
    &["objetivo", "meta", "propósito", "fin"],
];

pub(super) const ES_STOP_WORDS: &[&str] = &[
    "el", "la", "los", "las", "un", "una", "unos", "unas", "y", "o", "pero", "si", "de", "a",
    "en", "con", "por", "para", "que", "es", "son", "fue", "era", "ser", "se", "su", "sus",
    "lo", "le", "les", "al", "del", "como", "más", "muy", "también", "este", "esta", "estos",
    "estas", "ese", "esa", "no", "ya", "hay",
];
