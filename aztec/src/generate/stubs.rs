//! Embedded default stubs
//!
//! Used whenever the configured stubs directory does not provide an
//! override. Layer stubs use `{{ name }}` placeholders; module scaffold
//! and single-file stubs use `$NAME$` placeholders.

/// Controller for one model
pub const CONTROLLER: &str = r"<?php

namespace {{ controllerNamespace }};

use Illuminate\Http\Request;
use Illuminate\Routing\Controller;
use {{ modelFqcn }};
use {{ requestsNamespace }}\{{ storeRequest }};
use {{ requestsNamespace }}\{{ updateRequest }};
use {{ resourcesNamespace }}\{{ resourceClass }};
use {{ serviceNamespace }}\{{ serviceClass }};

class {{ controllerClass }} extends Controller
{
    public function __construct(
        protected {{ serviceClass }} $service
    ) {
    }

    public function index(Request $request)
    {
        ${{ modelPluralLower }} = $this->service->list(
            {{ listMethodArgs }},
            query: {{ model }}::query(){{ eagerLoadIndex }}
        );

        return {{ resourceClass }}::collection(${{ modelPluralLower }});
    }

    public function store({{ storeRequest }} $request)
    {
        ${{ modelVariable }} = $this->service->create($request->validated());

        return (new {{ resourceClass }}(${{ modelVariable }}))
            ->response()
            ->setStatusCode(201);
    }

    public function show(int|string $id)
    {
        ${{ modelVariable }} = $this->service->findOrFail($id){{ eagerLoadShow }};

        return new {{ resourceClass }}(${{ modelVariable }});
    }

    public function update({{ updateRequest }} $request, int|string $id)
    {
        ${{ modelVariable }} = $this->service->update($id, $request->validated());

        return new {{ resourceClass }}(${{ modelVariable }});
    }

    public function destroy(int|string $id)
    {
        $this->service->delete($id);

        return response()->noContent();
    }
}
";

/// Validation for creating a model
pub const STORE_REQUEST: &str = r"<?php

namespace {{ requestsNamespace }};

use Illuminate\Foundation\Http\FormRequest;

class {{ model }}StoreRequest extends FormRequest
{
    public function authorize(): bool
    {
        return true;
    }

    public function rules(): array
    {
        return [
{{ rules }}
        ];
    }
}
";

/// Validation for (partially) updating a model
pub const UPDATE_REQUEST: &str = r"<?php

namespace {{ requestsNamespace }};

use Illuminate\Foundation\Http\FormRequest;

class {{ model }}UpdateRequest extends FormRequest
{
    public function authorize(): bool
    {
        return true;
    }

    public function rules(): array
    {
        return [
{{ rules }}
        ];
    }
}
";

/// API resource
pub const RESOURCE: &str = r"<?php

namespace {{ resourcesNamespace }};

use Illuminate\Http\Resources\Json\JsonResource;

/** @mixin \{{ modelFqcn }} */
class {{ resourceClass }} extends JsonResource
{
{{ toArrayMethod }}
}
";

/// Repository contract
pub const REPOSITORY_INTERFACE: &str = r"<?php

namespace {{ repositoryNamespace }}\Interfaces;

use Illuminate\Database\Eloquent\Builder;
use Illuminate\Database\Eloquent\Collection;
use {{ modelFqcn }};

interface {{ interfaceClass }}
{
    public function query(): Builder;

    public function all(): Collection;

    public function find(int|string $id): ?{{ model }};

    public function findOrFail(int|string $id): {{ model }};

    public function create(array $data): {{ model }};

    public function update({{ model }} ${{ modelVariable }}, array $data): {{ model }};

    public function delete({{ model }} ${{ modelVariable }}): bool;
}
";

/// Eloquent repository
pub const REPOSITORY: &str = r"<?php

namespace {{ repositoryNamespace }};

use Illuminate\Database\Eloquent\Builder;
use Illuminate\Database\Eloquent\Collection;
use {{ modelFqcn }};
use {{ repositoryNamespace }}\Interfaces\{{ interfaceClass }};

class {{ repositoryClass }} implements {{ interfaceClass }}
{
    public function __construct(
        protected {{ model }} $model
    ) {
    }

    public function query(): Builder
    {
        return $this->model->newQuery();
    }

    public function all(): Collection
    {
        return $this->query()->get();
    }

    public function find(int|string $id): ?{{ model }}
    {
        return $this->query()->find($id);
    }

    public function findOrFail(int|string $id): {{ model }}
    {
        return $this->query()->findOrFail($id);
    }

    public function create(array $data): {{ model }}
    {
        return $this->query()->create($data);
    }

    public function update({{ model }} ${{ modelVariable }}, array $data): {{ model }}
    {
        ${{ modelVariable }}->update($data);

        return ${{ modelVariable }}->refresh();
    }

    public function delete({{ model }} ${{ modelVariable }}): bool
    {
        return (bool) ${{ modelVariable }}->delete();
    }
}
";

/// Business-logic service
pub const SERVICE: &str = r"<?php

namespace {{ serviceNamespace }};

use Illuminate\Contracts\Pagination\LengthAwarePaginator;
use Illuminate\Database\Eloquent\Builder;
use Illuminate\Support\Facades\DB;
use {{ modelFqcn }};
use {{ repositoryInterfaceNamespace }}\{{ repositoryInterface }};

class {{ serviceClass }}
{
    public function __construct(
        protected {{ repositoryInterface }} $repository
    ) {
    }

    public function list(?string $search = null, int|string|null $perPage = 15{{ filterParams }}, ?Builder $query = null): LengthAwarePaginator
    {
        $query ??= $this->repository->query();

        return $query
            ->when($search, function ($query, $search) {
                $like = '%' . $search . '%';
                $query->where(function ($q) use ($like) {
                      {{ searchLogic }}
                });
            })
            {{ filterLogic }}
            ->paginate((int) ($perPage ?: 15));
    }

    public function find(int|string $id): ?{{ modelName }}
    {
        return $this->repository->find($id);
    }

    public function findOrFail(int|string $id): {{ modelName }}
    {
        return $this->repository->findOrFail($id);
    }

    public function create(array $data): {{ modelName }}
    {
        return DB::transaction(function () use ($data) {
            $model = $this->repository->create($data);
            {{ syncRelationsCreate }}

            return $model;
        });
    }

    public function update(int|string $id, array $data): {{ modelName }}
    {
        return DB::transaction(function () use ($id, $data) {
            $model = $this->repository->update($this->repository->findOrFail($id), $data);
            {{ syncRelationsUpdate }}

            return $model;
        });
    }

    public function delete(int|string $id): bool
    {
        return $this->repository->delete($this->repository->findOrFail($id));
    }
}
";

/// Module manifest
pub const MODULE_JSON: &str = r#"{
    "name": "$STUDLY_NAME$",
    "alias": "$LOWER_NAME$",
    "description": "",
    "keywords": [],
    "priority": 0,
    "providers": [
        "$MODULE_NAMESPACE$\\$STUDLY_NAME$\\Providers\\$STUDLY_NAME$ServiceProvider"
    ],
    "files": []
}
"#;

/// Module composer manifest
pub const MODULE_COMPOSER: &str = r#"{
    "name": "$VENDOR$/$LOWER_NAME$",
    "description": "",
    "authors": [
        {
            "name": "$AUTHOR_NAME$",
            "email": "$AUTHOR_EMAIL$"
        }
    ],
    "extra": {
        "laravel": {
            "providers": [],
            "aliases": {}
        }
    },
    "autoload": {
        "psr-4": {
            "$MODULE_NAMESPACE$\\$STUDLY_NAME$\\": "$SOURCE_DIR$/",
            "$MODULE_NAMESPACE$\\$STUDLY_NAME$\\Database\\Factories\\": "database/factories/",
            "$MODULE_NAMESPACE$\\$STUDLY_NAME$\\Database\\Seeders\\": "database/seeders/"
        }
    },
    "autoload-dev": {
        "psr-4": {
            "$MODULE_NAMESPACE$\\$STUDLY_NAME$\\Tests\\": "tests/"
        }
    }
}
"#;

/// Module configuration file
pub const MODULE_CONFIG: &str = r"<?php

return [
    'name' => '$STUDLY_NAME$',
];
";

/// Main module service provider; `register()` is where repository bindings go
pub const MODULE_PROVIDER: &str = r"<?php

namespace $MODULE_NAMESPACE$\$STUDLY_NAME$\Providers;

use Illuminate\Support\ServiceProvider;

class $STUDLY_NAME$ServiceProvider extends ServiceProvider
{
    protected string $name = '$STUDLY_NAME$';

    protected string $nameLower = '$LOWER_NAME$';

    public function boot(): void
    {
        $this->loadMigrationsFrom(__DIR__ . '/../../database/migrations');
        $this->mergeConfigFrom(__DIR__ . '/../../config/config.php', $this->nameLower);
        $this->loadViewsFrom(__DIR__ . '/../../resources/views', $this->nameLower);
    }

    public function register(): void
    {
        $this->app->register(EventServiceProvider::class);
        $this->app->register(RouteServiceProvider::class);
    }
}
";

/// Module route service provider
pub const MODULE_ROUTE_PROVIDER: &str = r"<?php

namespace $MODULE_NAMESPACE$\$STUDLY_NAME$\Providers;

use Illuminate\Foundation\Support\Providers\RouteServiceProvider as ServiceProvider;
use Illuminate\Support\Facades\Route;

class RouteServiceProvider extends ServiceProvider
{
    public function map(): void
    {
        Route::middleware('web')->group(__DIR__ . '/../../routes/web.php');

        Route::middleware('api')
            ->prefix('api')
            ->name('api.')
            ->group(__DIR__ . '/../../routes/api.php');
    }
}
";

/// Module event service provider
pub const MODULE_EVENT_PROVIDER: &str = r"<?php

namespace $MODULE_NAMESPACE$\$STUDLY_NAME$\Providers;

use Illuminate\Foundation\Support\Providers\EventServiceProvider as ServiceProvider;

class EventServiceProvider extends ServiceProvider
{
    protected $listen = [];

    protected static $shouldDiscoverEvents = true;
}
";

/// Module database seeder
pub const MODULE_SEEDER: &str = r"<?php

namespace $MODULE_NAMESPACE$\$STUDLY_NAME$\Database\Seeders;

use Illuminate\Database\Seeder;

class $STUDLY_NAME$DatabaseSeeder extends Seeder
{
    public function run(): void
    {
        // $this->call([]);
    }
}
";

/// Module landing controller
pub const MODULE_CONTROLLER: &str = r"<?php

namespace $MODULE_NAMESPACE$\$STUDLY_NAME$\Http\Controllers;

use Illuminate\Routing\Controller;

class $STUDLY_NAME$Controller extends Controller
{
    public function index()
    {
        return view('$LOWER_NAME$::index');
    }
}
";

/// Module web routes
pub const MODULE_ROUTES_WEB: &str = r"<?php

use Illuminate\Support\Facades\Route;
use $MODULE_NAMESPACE$\$STUDLY_NAME$\Http\Controllers\$STUDLY_NAME$Controller;

Route::get('$LOWER_NAME$', [$STUDLY_NAME$Controller::class, 'index'])->name('$LOWER_NAME$.index');
";

/// Module API routes
pub const MODULE_ROUTES_API: &str = r"<?php

use Illuminate\Support\Facades\Route;

Route::prefix('v1')->group(function () {
    //
});
";

/// Module asset build configuration
pub const MODULE_VITE: &str = r"import { defineConfig } from 'vite';
import laravel from 'laravel-vite-plugin';

export default defineConfig({
    build: {
        outDir: '../../public/build-$LOWER_NAME$',
        emptyOutDir: true,
        manifest: true,
    },
    plugins: [
        laravel({
            publicDirectory: '../../public',
            buildDirectory: 'build-$LOWER_NAME$',
            input: [
                __dirname + '/resources/assets/sass/app.scss',
                __dirname + '/resources/assets/js/app.js',
            ],
            refresh: true,
        }),
    ],
});
";

/// Module layout view
pub const MODULE_VIEW_MASTER: &str = r#"<!DOCTYPE html>
<html lang="{{ str_replace('_', '-', app()->getLocale()) }}">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>$STUDLY_NAME$</title>
</head>
<body>
    {{ $slot }}
</body>
</html>
"#;

/// Module landing view
pub const MODULE_VIEW_INDEX: &str = r"<x-$LOWER_NAME$::layouts.master>
    <h1>$STUDLY_NAME$</h1>

    <p>Module: {!! config('$LOWER_NAME$.name') !!}</p>
</x-$LOWER_NAME$::layouts.master>
";

/// Bare Eloquent model
pub const FILE_MODEL: &str = r"<?php

namespace $NAMESPACE$;

use Illuminate\Database\Eloquent\Factories\HasFactory;
use Illuminate\Database\Eloquent\Model;

class $CLASS$ extends Model
{
    use HasFactory;

    protected $fillable = [];
}
";

/// Bare module controller
pub const FILE_CONTROLLER: &str = r"<?php

namespace $NAMESPACE$;

use Illuminate\Http\Request;
use Illuminate\Routing\Controller;

class $CLASS$ extends Controller
{
    public function index()
    {
        return view('$MODULE_LOWER$::index');
    }
}
";

/// Bare form request
pub const FILE_REQUEST: &str = r"<?php

namespace $NAMESPACE$;

use Illuminate\Foundation\Http\FormRequest;

class $CLASS$ extends FormRequest
{
    public function authorize(): bool
    {
        return true;
    }

    public function rules(): array
    {
        return [
            //
        ];
    }
}
";

/// Bare API resource
pub const FILE_RESOURCE: &str = r"<?php

namespace $NAMESPACE$;

use Illuminate\Http\Resources\Json\JsonResource;

class $CLASS$ extends JsonResource
{
    public function toArray($request): array
    {
        return parent::toArray($request);
    }
}
";

/// Every embedded stub with its lookup name
pub const ALL: &[(&str, &str)] = &[
    ("controller.stub", CONTROLLER),
    ("store-request.stub", STORE_REQUEST),
    ("update-request.stub", UPDATE_REQUEST),
    ("resource.stub", RESOURCE),
    ("repository-interface.stub", REPOSITORY_INTERFACE),
    ("repository.stub", REPOSITORY),
    ("service.stub", SERVICE),
    ("module/module.stub", MODULE_JSON),
    ("module/composer.stub", MODULE_COMPOSER),
    ("module/config.stub", MODULE_CONFIG),
    ("module/provider.stub", MODULE_PROVIDER),
    ("module/route-provider.stub", MODULE_ROUTE_PROVIDER),
    ("module/event-provider.stub", MODULE_EVENT_PROVIDER),
    ("module/seeder.stub", MODULE_SEEDER),
    ("module/controller.stub", MODULE_CONTROLLER),
    ("module/routes-web.stub", MODULE_ROUTES_WEB),
    ("module/routes-api.stub", MODULE_ROUTES_API),
    ("module/vite.stub", MODULE_VITE),
    ("module/view-master.stub", MODULE_VIEW_MASTER),
    ("module/view-index.stub", MODULE_VIEW_INDEX),
    ("files/model.stub", FILE_MODEL),
    ("files/controller.stub", FILE_CONTROLLER),
    ("files/request.stub", FILE_REQUEST),
    ("files/resource.stub", FILE_RESOURCE),
];

/// Embedded stub by name
#[must_use]
pub fn embedded(name: &str) -> Option<&'static str> {
    ALL.iter()
        .find(|(stub, _)| *stub == name)
        .map(|(_, body)| *body)
}
